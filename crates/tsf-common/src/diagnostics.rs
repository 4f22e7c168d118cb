//! Diagnostics and per-module error accumulation.
//!
//! The scanner and parser record every error they encounter and keep going;
//! the reporter renders the accumulated list at the end of a run with the
//! offending source line and a caret under the span. Speculative parses
//! roll their diagnostics back by truncating to a recorded count.

use crate::span::SourcePosition;
use serde::Serialize;

/// Classification of front-end errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Illegal byte, overlong UTF-8, unterminated string, malformed number,
    /// bad escape.
    Lexical,
    /// Expected token not found, illegal token in context, unbalanced
    /// bracket, invalid assignment target.
    Syntax,
    /// `break`/`continue`/`return`/`yield` used outside the construct that
    /// licenses them, `const` without initializer.
    Context,
    /// Overload signature mismatch, getter/setter shape violation.
    Overload,
    /// Unrecoverable: end of input reached while balancing brackets.
    Fatal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "LexicalError",
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Context => "ContextError",
            ErrorKind::Overload => "OverloadError",
            ErrorKind::Fatal => "FatalParseError",
        }
    }
}

/// A single recorded error.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub pos: SourcePosition,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: ErrorKind, pos: SourcePosition, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            pos,
            message: message.into(),
        }
    }
}

/// Accumulates diagnostics for one module.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    #[must_use]
    pub fn new() -> Self {
        ErrorReporter::default()
    }

    pub fn report(&mut self, kind: ErrorKind, pos: SourcePosition, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(kind, pos, message));
    }

    pub fn lexical_error(&mut self, pos: SourcePosition, message: impl Into<String>) {
        self.report(ErrorKind::Lexical, pos, message);
    }

    pub fn syntax_error(&mut self, pos: SourcePosition, message: impl Into<String>) {
        self.report(ErrorKind::Syntax, pos, message);
    }

    pub fn context_error(&mut self, pos: SourcePosition, message: impl Into<String>) {
        self.report(ErrorKind::Context, pos, message);
    }

    pub fn overload_error(&mut self, pos: SourcePosition, message: impl Into<String>) {
        self.report(ErrorKind::Overload, pos, message);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Roll back to a previously observed count. Used when a speculative
    /// parse attempt is abandoned and its errors must not surface.
    pub fn truncate(&mut self, count: usize) {
        self.diagnostics.truncate(count);
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Render the source line containing `pos` plus a caret line under the span.
///
/// Returns `None` when the offset lies outside the text.
#[must_use]
pub fn render_caret(source: &str, pos: SourcePosition) -> Option<String> {
    let start = pos.start_offset as usize;
    if start > source.len() {
        return None;
    }
    let bytes = source.as_bytes();
    let line_start = memchr::memrchr(b'\n', &bytes[..start]).map_or(0, |i| i + 1);
    let line_end = memchr::memchr(b'\n', &bytes[start..])
        .map_or(source.len(), |i| start + i);
    let line = source.get(line_start..line_end)?.trim_end_matches('\r');

    let column = source.get(line_start..start)?.chars().count();
    let span_len = (pos.end_offset as usize)
        .min(line_end)
        .saturating_sub(start)
        .max(1);
    let mut rendered = String::with_capacity(line.len() * 2 + 8);
    rendered.push_str(line);
    rendered.push('\n');
    rendered.extend(std::iter::repeat_n(' ', column));
    rendered.extend(std::iter::repeat_n('^', span_len));
    Some(rendered)
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
