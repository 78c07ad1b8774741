//! Synthesized `mdat` header and repaired stream assembly.

use crate::atom::{find_all, AtomType};
use crate::locator::{locate_moov, AnchorOffset};
use crate::{DeviceProfile, Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Extended-size `mdat` header.
///
/// Layout: `size = 1` (escape to the 64-bit field), `"mdat"`, then the
/// 64-bit big-endian declared size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdatHeader {
    pub declared_size: u64,
}

impl MdatHeader {
    /// Encoded header length.
    pub const LEN: usize = 16;

    /// Value of the 32-bit size field that signals an extended size.
    const SIZE_ESCAPE: u32 = 1;

    /// Header whose declared size is derived from `anchor`.
    pub fn for_anchor(anchor: AnchorOffset) -> Result<Self> {
        Ok(Self {
            declared_size: anchor.declared_size()?,
        })
    }

    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_u32(Self::SIZE_ESCAPE);
        buf.put_slice(AtomType::MDAT.as_bytes());
        buf.put_u64(self.declared_size);
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = BytesMut::with_capacity(Self::LEN);
        self.write_to(&mut buf);
        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(&buf);
        out
    }

    /// Parse a header from the start of `data`.
    ///
    /// Returns `None` unless the data begins with an extended-size `mdat`.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < Self::LEN {
            return None;
        }
        let mut cursor = &data[..Self::LEN];
        if cursor.get_u32() != Self::SIZE_ESCAPE {
            return None;
        }
        let mut tag = [0u8; 4];
        cursor.copy_to_slice(&mut tag);
        if AtomType::from_bytes(tag) != AtomType::MDAT {
            return None;
        }
        Some(Self {
            declared_size: cursor.get_u64(),
        })
    }
}

/// What a repair of a given capture would do.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairPlan {
    /// Length of the corrupted input.
    pub input_len: usize,
    /// Every offset at which a `moov` tag was found, ascending.
    pub marker_offsets: Vec<u64>,
    /// Anchor derived from the last tag.
    pub anchor: AnchorOffset,
    /// Size field of the synthesized header.
    pub declared_size: u64,
    /// Length of the repaired stream.
    pub output_len: usize,
}

fn check_len(buffer: &[u8], profile: &DeviceProfile) -> Result<()> {
    let min = profile.min_input_len();
    if buffer.len() < min {
        return Err(Error::Truncated {
            len: buffer.len(),
            min,
        });
    }
    Ok(())
}

fn output_len(input_len: usize, profile: &DeviceProfile) -> usize {
    MdatHeader::LEN + input_len - profile.min_input_len()
}

/// Analyze a capture without building the repaired stream.
pub fn inspect(buffer: &[u8], profile: &DeviceProfile) -> Result<RepairPlan> {
    let anchor = locate_moov(buffer)?;
    check_len(buffer, profile)?;
    let header = MdatHeader::for_anchor(anchor)?;

    Ok(RepairPlan {
        input_len: buffer.len(),
        marker_offsets: find_all(buffer, AtomType::MOOV.as_bytes())
            .map(|offset| offset as u64)
            .collect(),
        anchor,
        declared_size: header.declared_size,
        output_len: output_len(buffer.len(), profile),
    })
}

/// Build the repaired stream for `buffer`.
///
/// The leading `header_skip_bytes` are replaced by a synthesized
/// [`MdatHeader`] and the last `trailer_trim_bytes` are dropped. With the
/// default profile the output is exactly 334 bytes shorter than the input.
pub fn reconstruct(buffer: &[u8], anchor: AnchorOffset, profile: &DeviceProfile) -> Result<Bytes> {
    check_len(buffer, profile)?;
    let header = MdatHeader::for_anchor(anchor)?;

    let payload = &buffer[profile.header_skip_bytes..buffer.len() - profile.trailer_trim_bytes];
    let mut out = BytesMut::with_capacity(MdatHeader::LEN + payload.len());
    header.write_to(&mut out);
    out.put_slice(payload);

    tracing::debug!(
        anchor = anchor.get(),
        declared_size = header.declared_size,
        input_len = buffer.len(),
        output_len = out.len(),
        "reconstructed mdat stream"
    );

    Ok(out.freeze())
}
