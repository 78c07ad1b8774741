//! Device-specific layout constants.

/// Byte counts that depend on the recording device and firmware.
///
/// The defaults match captures from the one camera family this tool was
/// built against. Neither value is derived from the container; both were
/// found empirically, so other devices need their own profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DeviceProfile {
    /// Leading bytes of the capture discarded and replaced by the
    /// synthesized header.
    pub header_skip_bytes: usize,
    /// Footer bytes appended by the device that are cut from the end.
    pub trailer_trim_bytes: usize,
}

impl DeviceProfile {
    pub const DEFAULT_HEADER_SKIP: usize = 16;
    pub const DEFAULT_TRAILER_TRIM: usize = 334;

    pub fn new(header_skip_bytes: usize, trailer_trim_bytes: usize) -> Self {
        Self {
            header_skip_bytes,
            trailer_trim_bytes,
        }
    }

    /// Shortest capture that still leaves something to copy.
    pub fn min_input_len(&self) -> usize {
        self.header_skip_bytes.saturating_add(self.trailer_trim_bytes)
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEADER_SKIP, Self::DEFAULT_TRAILER_TRIM)
    }
}
