use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use tsf_common::{CompilerOptions, LanguageMode, ModuleKind};

/// CLI arguments for the tsf binary.
#[derive(Parser, Debug)]
#[command(name = "tsf", version, about = "tsf - a TypeScript front end in Rust")]
pub struct CliArgs {
    /// Input files or directories.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Set the language mode used for scanning and parsing.
    #[arg(short = 't', long, value_enum, ignore_case = true, default_value_t = Target::Es6)]
    pub target: Target,

    /// Choose whether `module` is a keyword (typescript) or the ES6
    /// `module x from "..."` shorthand is preferred.
    #[arg(short = 'm', long, value_enum, ignore_case = true, default_value_t = Module::Typescript)]
    pub module: Module,

    /// Number of worker threads; defaults to the CPU count.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Print names of files that are part of the compilation and stop.
    #[arg(long = "listFiles", alias = "list-files")]
    pub list_files: bool,

    /// Suppress source excerpts under reported errors.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Emit diagnostics as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Es3,
    Es5,
    Es6,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Module {
    Typescript,
    Es6,
}

impl CliArgs {
    #[must_use]
    pub fn compiler_options(&self) -> CompilerOptions {
        let language_mode = match self.target {
            Target::Es3 => LanguageMode::Es3,
            Target::Es5 => LanguageMode::Es5Strict,
            Target::Es6 => LanguageMode::Es6,
        };
        let module_kind = match self.module {
            Module::Typescript => ModuleKind::TypeScript,
            Module::Es6 => ModuleKind::Es6,
        };
        CompilerOptions::new(language_mode, module_kind)
    }
}
