//! Compilation driver and CLI support for the tsf TypeScript front end.
//!
//! The driver schedules per-file parse jobs on a worker pool, follows
//! `/// <reference path>` directives and relative import specifiers to the
//! transitive module set, and accumulates the resulting compilation units.

pub mod args;
pub mod driver;
pub mod reporter;

use anyhow::Result;
use clap::Parser as _;
use std::path::PathBuf;
use walkdir::WalkDir;

use args::CliArgs;
use driver::Compiler;

/// Expand the positional inputs: directories become every `.ts`/`.d.ts`
/// file beneath them.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "ts") {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// CLI entry point; returns the process exit code.
pub fn run() -> i32 {
    let args = CliArgs::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let files = match discover_inputs(&args.inputs) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("error: {error}");
            return 1;
        }
    };
    if files.is_empty() {
        eprintln!("error: no input files");
        return 1;
    }

    let compiler = match Compiler::new(args.compiler_options(), args.threads) {
        Ok(compiler) => compiler,
        Err(error) => {
            eprintln!("error: {error}");
            return 1;
        }
    };
    let units = compiler.compile(&files);

    if args.list_files {
        for unit in &units {
            println!("{}", unit.module_name().display());
        }
        return 0;
    }

    if args.json {
        println!("{}", reporter::render_json(&units));
    } else {
        reporter::report(&units, args.quiet);
    }
    if units.iter().any(|unit| unit.has_errors()) {
        1
    } else {
        0
    }
}
