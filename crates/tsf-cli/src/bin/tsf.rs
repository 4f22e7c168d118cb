fn main() {
    std::process::exit(tsf_cli::run());
}
