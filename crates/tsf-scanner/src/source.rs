//! Source streams and the Unicode input adapter.
//!
//! `SourceStream` loads a file (or in-memory text) and hands out the raw
//! bytes. `UnicodeIterAdapter` lifts those bytes into a sequence of Unicode
//! scalars with line-accurate positions, rejecting overlong encodings,
//! surrogate halves and out-of-range values.

use crate::unicode::Uchar;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded source file.
///
/// The bytes are shared; cloning a stream is cheap and the compilation unit
/// keeps one alive for caret rendering.
#[derive(Clone, Debug)]
pub struct SourceStream {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl SourceStream {
    /// Read `path`. The content is kept as raw bytes; UTF-8 validation
    /// happens in the adapter so malformed sequences surface as lexical
    /// diagnostics with positions rather than as I/O failures.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path)?;
        Ok(SourceStream {
            path,
            bytes: bytes.into(),
        })
    }

    /// Wrap in-memory source text.
    #[must_use]
    pub fn from_source(name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        SourceStream {
            path: name.into(),
            bytes: text.into().into_bytes().into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The content as text, replacing any malformed sequences. Used by the
    /// diagnostic reporter.
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// A decoded scalar together with where it came from.
#[derive(Clone, Copy, Debug)]
pub struct Scalar {
    pub uchar: Uchar,
    /// Byte offset of the first byte of this scalar.
    pub offset: u32,
    /// 1-based line this scalar sits on.
    pub line: u32,
}

impl Scalar {
    const fn null_at(offset: u32, line: u32) -> Self {
        Scalar {
            uchar: Uchar::NULL,
            offset,
            line,
        }
    }
}

/// Restorable position of a `UnicodeIterAdapter`.
#[derive(Clone, Copy, Debug)]
pub struct AdapterCheckpoint {
    pos: usize,
    line: u32,
}

/// Forward iterator over UTF-8 bytes yielding Unicode scalars.
///
/// Lone surrogates, overlong encodings and values above U+10FFFF come out as
/// `Uchar::INVALID`; the caller turns those into lexical diagnostics.
#[derive(Debug)]
pub struct UnicodeIterAdapter<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> UnicodeIterAdapter<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        UnicodeIterAdapter {
            bytes,
            pos: 0,
            line: 1,
        }
    }

    /// Decode the scalar at the cursor and advance past it.
    pub fn advance(&mut self) -> Scalar {
        let offset = u32::try_from(self.pos).unwrap_or(u32::MAX);
        if self.pos >= self.bytes.len() {
            return Scalar::null_at(offset, self.line);
        }
        let line = self.line;
        let (uchar, width) = self.decode_at(self.pos);
        self.pos += width;
        if uchar.is_line_break() {
            // CRLF advances the line once: the CR half defers to the LF.
            let crlf_half = uchar.is('\r') && self.bytes.get(self.pos) == Some(&b'\n');
            if !crlf_half {
                self.line += 1;
            }
        }
        Scalar {
            uchar,
            offset,
            line,
        }
    }

    /// Decode the scalar at the cursor without consuming it.
    #[must_use]
    pub fn peek(&self) -> Uchar {
        if self.pos >= self.bytes.len() {
            return Uchar::NULL;
        }
        self.decode_at(self.pos).0
    }

    #[must_use]
    pub fn checkpoint(&self) -> AdapterCheckpoint {
        AdapterCheckpoint {
            pos: self.pos,
            line: self.line,
        }
    }

    pub fn restore(&mut self, cp: AdapterCheckpoint) {
        self.pos = cp.pos;
        self.line = cp.line;
    }

    /// Reposition to an absolute byte offset/line pair (used when the
    /// scanner re-scans template continuations and regexp bodies).
    pub fn seek(&mut self, offset: u32, line: u32) {
        self.pos = (offset as usize).min(self.bytes.len());
        self.line = line;
    }

    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.pos as u32
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Decode one scalar starting at `at`. Returns the scalar and the number
    /// of bytes consumed (at least 1, so malformed input cannot stall).
    fn decode_at(&self, at: usize) -> (Uchar, usize) {
        let lead = self.bytes[at];
        match lead {
            0x00..=0x7F => (Uchar::from_ascii(lead), 1),
            0xC2..=0xDF => self.decode_multi(at, 2, u32::from(lead & 0x1F), 0x80),
            0xE0..=0xEF => self.decode_multi(at, 3, u32::from(lead & 0x0F), 0x800),
            0xF0..=0xF4 => self.decode_multi(at, 4, u32::from(lead & 0x07), 0x1_0000),
            // 0xC0/0xC1 are always-overlong lead bytes; stray continuation
            // bytes and 0xF5+ are malformed as well.
            _ => (Uchar::INVALID, 1),
        }
    }

    fn decode_multi(&self, at: usize, len: usize, lead_bits: u32, min: u32) -> (Uchar, usize) {
        if at + len > self.bytes.len() {
            return (Uchar::INVALID, self.bytes.len() - at);
        }
        let mut value = lead_bits;
        for i in 1..len {
            let b = self.bytes[at + i];
            if b & 0xC0 != 0x80 {
                return (Uchar::INVALID, i);
            }
            value = (value << 6) | u32::from(b & 0x3F);
        }
        if value < min || value > 0x10_FFFF || (0xD800..=0xDFFF).contains(&value) {
            return (Uchar::INVALID, len);
        }
        (Uchar::new(value), len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<u32> {
        let mut adapter = UnicodeIterAdapter::new(text.as_bytes());
        let mut out = Vec::new();
        loop {
            let s = adapter.advance();
            if s.uchar.is_null() {
                break;
            }
            out.push(s.uchar.value());
        }
        out
    }

    #[test]
    fn decodes_multibyte_sequences() {
        assert_eq!(collect("aλ→\u{1F600}"), vec![
            'a' as u32,
            'λ' as u32,
            '→' as u32,
            0x1F600,
        ]);
    }

    #[test]
    fn crlf_counts_as_one_line() {
        let mut adapter = UnicodeIterAdapter::new(b"a\r\nb\nc");
        assert_eq!(adapter.advance().line, 1); // a
        assert_eq!(adapter.advance().line, 1); // \r
        assert_eq!(adapter.advance().line, 1); // \n closes line 1
        assert_eq!(adapter.advance().line, 2); // b
        adapter.advance(); // \n
        assert_eq!(adapter.advance().line, 3); // c
    }

    #[test]
    fn paragraph_separator_breaks_lines() {
        let mut adapter = UnicodeIterAdapter::new("a\u{2029}b".as_bytes());
        assert_eq!(adapter.advance().line, 1);
        adapter.advance();
        assert_eq!(adapter.advance().line, 2);
    }

    #[test]
    fn checkpoint_restore_replays_the_stream() {
        let mut adapter = UnicodeIterAdapter::new(b"one\ntwo");
        adapter.advance();
        let cp = adapter.checkpoint();
        let a = adapter.advance();
        adapter.advance();
        adapter.restore(cp);
        let b = adapter.advance();
        assert_eq!(a.uchar, b.uchar);
        assert_eq!(a.offset, b.offset);
        assert_eq!(a.line, b.line);
    }

    #[test]
    fn truncated_sequence_is_invalid_not_a_panic() {
        let mut adapter = UnicodeIterAdapter::new(&[0xE2, 0x82]); // truncated euro sign
        assert!(adapter.advance().uchar.is_invalid());
    }

    #[test]
    fn overlong_and_surrogate_encodings_are_rejected() {
        // 0xC0 0xAF would be an overlong '/'.
        let mut adapter = UnicodeIterAdapter::new(&[0xC0, 0xAF]);
        assert!(adapter.advance().uchar.is_invalid());
        // 0xED 0xA0 0x80 encodes the surrogate half U+D800.
        let mut adapter = UnicodeIterAdapter::new(&[0xED, 0xA0, 0x80]);
        assert!(adapter.advance().uchar.is_invalid());
    }
}
