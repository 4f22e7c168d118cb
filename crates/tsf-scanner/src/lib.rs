//! TypeScript scanner for the tsf front end.
//!
//! Turns a UTF-8 source stream into a token stream, honouring the
//! context-sensitive rules JavaScript forces on any tokenizer: regular
//! expression literals vs division, generic `<...>` vs less-than, and
//! `/// <reference path>` comments.

pub mod scanner;
pub mod source;
pub mod token;
pub mod unicode;

pub use scanner::{Scanner, ScannerCheckpoint};
pub use source::{SourceStream, UnicodeIterAdapter};
pub use token::{Token, TokenKind};
pub use unicode::Uchar;
