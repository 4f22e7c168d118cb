//! Common types and utilities for the tsf TypeScript front end.
//!
//! This crate provides foundational types used across all tsf crates:
//! - Literal interning (`Atom`, `LiteralBuffer`)
//! - Compiler options (`LanguageMode`, `ModuleKind`, `CompilerOptions`)
//! - Source positions (`SourcePosition`)
//! - Diagnostics and error reporting (`Diagnostic`, `ErrorReporter`)

// Literal interning for identifier and literal deduplication
pub mod literal;
pub use literal::{Atom, LiteralBuffer};

// Compiler options - language mode and module kind gates
pub mod common;
pub use common::{CompilerOptions, LanguageMode, ModuleKind};

// SourcePosition - source location tracking
pub mod span;
pub use span::SourcePosition;

// Diagnostics and per-module error accumulation
pub mod diagnostics;
pub use diagnostics::{Diagnostic, ErrorKind, ErrorReporter};
