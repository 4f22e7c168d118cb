//! SourcePosition - source location tracking for tokens and AST nodes
//!
//! A `SourcePosition` covers a region of source text by byte offsets and
//! carries the start/end line numbers the scanner observed. It is used for:
//! - Tracking the location of tokens and AST nodes
//! - Pointing to error locations in diagnostics
//! - Keying the parser's memoization table (positions compare by start offset)
//!
//! Offsets use half-open intervals `[start, end)`; lines are 1-based.

use serde::{Deserialize, Serialize};

/// A region of source code: byte offsets plus line numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Start byte offset (inclusive)
    pub start_offset: u32,
    /// End byte offset (exclusive)
    pub end_offset: u32,
    /// 1-based line the region starts on
    pub start_line: u32,
    /// 1-based line the region ends on
    pub end_line: u32,
}

impl SourcePosition {
    /// Create a new position from offsets and lines.
    #[inline]
    pub const fn new(start_offset: u32, end_offset: u32, start_line: u32, end_line: u32) -> Self {
        SourcePosition {
            start_offset,
            end_offset,
            start_line,
            end_line,
        }
    }

    /// Create an empty position at the given offset.
    #[inline]
    pub const fn at(offset: u32, line: u32) -> Self {
        SourcePosition {
            start_offset: offset,
            end_offset: offset,
            start_line: line,
            end_line: line,
        }
    }

    /// Length of the region in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end_offset.saturating_sub(self.start_offset)
    }

    /// Check if the region is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Check if this region fully contains another region.
    #[inline]
    pub const fn contains(&self, other: SourcePosition) -> bool {
        other.start_offset >= self.start_offset && other.end_offset <= self.end_offset
    }

    /// Merge two regions into one covering both.
    #[inline]
    pub fn merge(&self, other: SourcePosition) -> SourcePosition {
        let (start_offset, start_line) = if self.start_offset <= other.start_offset {
            (self.start_offset, self.start_line)
        } else {
            (other.start_offset, other.start_line)
        };
        let (end_offset, end_line) = if self.end_offset >= other.end_offset {
            (self.end_offset, self.end_line)
        } else {
            (other.end_offset, other.end_line)
        };
        SourcePosition {
            start_offset,
            end_offset,
            start_line,
            end_line,
        }
    }

    /// Grow the region so it ends where `other` ends.
    #[inline]
    pub const fn extend_to(&self, other: SourcePosition) -> SourcePosition {
        SourcePosition {
            start_offset: self.start_offset,
            end_offset: other.end_offset,
            start_line: self.start_line,
            end_line: other.end_line,
        }
    }

    /// Extract the slice of text covered by this region.
    #[inline]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        let start = (self.start_offset as usize).min(text.len());
        let end = (self.end_offset as usize).min(text.len());
        text.get(start..end).unwrap_or("")
    }
}

impl PartialOrd for SourcePosition {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourcePosition {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start_offset.cmp(&other.start_offset)
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.start_line, self.start_offset, self.end_offset)
    }
}

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod tests;
