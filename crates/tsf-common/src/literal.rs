//! Literal interning.
//!
//! Every identifier, string, number and regexp body the scanner produces is
//! interned into a per-module `LiteralBuffer`. Interning is idempotent: the
//! same UTF-8 byte sequence always yields the same `Atom`, so equality on
//! interned values is `Atom` equality. Each record keeps the UTF-8 text, its
//! UTF-16 re-encoding and the hash of the UTF-8 bytes.

use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

/// Handle to an interned literal. Cheap to copy and compare; only
/// meaningful together with the `LiteralBuffer` that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One interned literal record.
#[derive(Debug)]
struct LiteralRecord {
    utf8: Box<str>,
    utf16: Box<[u16]>,
    utf8_hash: u64,
}

/// Interning map from UTF-8 text to shared literal records.
///
/// One buffer exists per module; the scanner of that module is the only
/// writer.
#[derive(Debug, Default)]
pub struct LiteralBuffer {
    map: FxHashMap<Box<str>, Atom>,
    records: Vec<LiteralRecord>,
}

impl LiteralBuffer {
    #[must_use]
    pub fn new() -> Self {
        LiteralBuffer::default()
    }

    /// Intern `text`, returning the canonical `Atom` for it.
    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(&atom) = self.map.get(text) {
            return atom;
        }
        let mut hasher = FxHasher::default();
        text.as_bytes().hash(&mut hasher);
        let record = LiteralRecord {
            utf8: text.into(),
            utf16: text.encode_utf16().collect(),
            utf8_hash: hasher.finish(),
        };
        let atom = Atom(u32::try_from(self.records.len()).unwrap_or(u32::MAX));
        self.records.push(record);
        self.map.insert(text.into(), atom);
        atom
    }

    /// The atom for `text`, if it has been interned.
    #[must_use]
    pub fn lookup(&self, text: &str) -> Option<Atom> {
        self.map.get(text).copied()
    }

    /// UTF-8 text of an interned literal.
    #[must_use]
    pub fn utf8(&self, atom: Atom) -> &str {
        &self.records[atom.index()].utf8
    }

    /// UTF-16 code units of an interned literal.
    #[must_use]
    pub fn utf16(&self, atom: Atom) -> &[u16] {
        &self.records[atom.index()].utf16
    }

    /// Hash of the UTF-8 bytes, computed at interning time.
    #[must_use]
    pub fn utf8_hash(&self, atom: Atom) -> u64 {
        self.records[atom.index()].utf8_hash
    }

    /// Length of the UTF-8 text in bytes.
    #[must_use]
    pub fn utf8_len(&self, atom: Atom) -> usize {
        self.records[atom.index()].utf8.len()
    }

    /// Number of distinct literals interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/literal_tests.rs"]
mod tests;
