//! Diagnostic rendering.
//!
//! Human output prints one block per error: severity tag, location,
//! message, and the offending source line with a caret under the span.
//! JSON output serializes the wire format of the diagnostics directly.

use colored::Colorize;

use crate::driver::CompilationUnit;
use tsf_common::diagnostics::render_caret;

/// Print every recorded diagnostic to stderr. Returns the error count.
pub fn report(units: &[CompilationUnit], quiet: bool) -> usize {
    let mut count = 0;
    for unit in units {
        match unit {
            CompilationUnit::Failed { module, error } => {
                count += 1;
                eprintln!(
                    "{}: {}: {}",
                    "error".red().bold(),
                    module.module_name.display(),
                    error
                );
            }
            CompilationUnit::Parsed {
                module,
                source,
                output,
            } => {
                let text = source.text_lossy();
                for diagnostic in &output.diagnostics {
                    count += 1;
                    eprintln!(
                        "{}[{}]: {}:{}: {}",
                        "error".red().bold(),
                        diagnostic.kind.as_str(),
                        module.module_name.display(),
                        diagnostic.pos.start_line,
                        diagnostic.message
                    );
                    if !quiet {
                        if let Some(excerpt) = render_caret(&text, diagnostic.pos) {
                            for line in excerpt.lines() {
                                eprintln!("    {line}");
                            }
                        }
                    }
                }
            }
        }
    }
    count
}

/// Serialize all units' diagnostics as a JSON array.
#[must_use]
pub fn render_json(units: &[CompilationUnit]) -> String {
    let mut entries = Vec::new();
    for unit in units {
        match unit {
            CompilationUnit::Failed { module, error } => {
                entries.push(serde_json::json!({
                    "file": module.module_name.display().to_string(),
                    "kind": "IoError",
                    "message": error,
                }));
            }
            CompilationUnit::Parsed { module, output, .. } => {
                for diagnostic in &output.diagnostics {
                    entries.push(serde_json::json!({
                        "file": module.module_name.display().to_string(),
                        "kind": diagnostic.kind.as_str(),
                        "position": {
                            "start_offset": diagnostic.pos.start_offset,
                            "end_offset": diagnostic.pos.end_offset,
                            "start_line": diagnostic.pos.start_line,
                            "end_line": diagnostic.pos.end_line,
                        },
                        "message": diagnostic.message,
                    }));
                }
            }
        }
    }
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}
