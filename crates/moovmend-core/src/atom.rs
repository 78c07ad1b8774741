//! Atom type codes and byte-pattern scanning.
//!
//! Nothing here parses box structure. A damaged capture cannot be walked
//! header by header, so tags are located by plain substring search.

use std::fmt;

/// Four-character atom type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomType(pub [u8; 4]);

impl AtomType {
    pub const MOOV: Self = Self(*b"moov");
    pub const MDAT: Self = Self(*b"mdat");

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Get the 4-char code as a string.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Find the first occurrence of `pattern` at or after `start`.
fn find_from(buffer: &[u8], pattern: &[u8], start: usize) -> Option<usize> {
    if pattern.is_empty() || start >= buffer.len() {
        return None;
    }
    buffer[start..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|pos| start + pos)
}

/// Iterator over every occurrence of a pattern, resuming one byte past the
/// previous match.
pub struct Occurrences<'a> {
    buffer: &'a [u8],
    pattern: &'a [u8],
    next_start: usize,
}

impl Iterator for Occurrences<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let found = find_from(self.buffer, self.pattern, self.next_start)?;
        self.next_start = found + 1;
        Some(found)
    }
}

/// Iterate over every offset at which `pattern` occurs in `buffer`.
///
/// The scan includes offset 0. A tag at the very start of a capture is
/// found, and the locator then rejects its anchor as an invalid offset.
pub fn find_all<'a>(buffer: &'a [u8], pattern: &'a [u8]) -> Occurrences<'a> {
    Occurrences {
        buffer,
        pattern,
        next_start: 0,
    }
}

/// Offset of the last (highest) occurrence of `pattern`, if any.
///
/// The scan runs forward and keeps the highest match seen.
pub fn find_last(buffer: &[u8], pattern: &[u8]) -> Option<usize> {
    find_all(buffer, pattern).last()
}
