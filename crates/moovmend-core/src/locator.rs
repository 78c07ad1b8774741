//! Anchor location from the last `moov` tag.

use crate::atom::{find_last, AtomType};
use crate::{Error, Result};
use std::fmt;

/// Byte position immediately after the last `moov` tag in a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorOffset(pub u64);

impl AnchorOffset {
    /// Smallest anchor that yields a non-negative declared size.
    pub const MIN: u64 = 8;

    pub fn get(self) -> u64 {
        self.0
    }

    /// Body size written into the synthesized `mdat` header.
    pub fn declared_size(self) -> Result<u64> {
        self.0.checked_sub(Self::MIN).ok_or(Error::InvalidOffset {
            anchor: self.0,
            min: Self::MIN,
        })
    }
}

impl fmt::Display for AnchorOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locate the anchor offset of a capture.
///
/// When the tag occurs more than once the last occurrence wins; trailing
/// copies of a truncated metadata box sit closest to the salvageable data.
pub fn locate_moov(buffer: &[u8]) -> Result<AnchorOffset> {
    let tag = AtomType::MOOV;
    let offset = find_last(buffer, tag.as_bytes())
        .ok_or_else(|| Error::not_found("moov"))?;
    let anchor = AnchorOffset((offset + tag.as_bytes().len()) as u64);

    tracing::debug!(tag_offset = offset, anchor = anchor.0, "located last moov tag");

    Ok(anchor)
}
