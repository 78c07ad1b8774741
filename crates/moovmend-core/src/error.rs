//! Error types for moovmend-core.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for moovmend-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a single capture's repair.
///
/// None of these are fatal to a batch; callers classify them with
/// [`Error::kind`] and move on to the next file.
#[derive(Debug, Error)]
pub enum Error {
    /// The metadata-box marker does not occur anywhere in the buffer.
    #[error("cannot find '{marker}' in the capture")]
    NotFound { marker: &'static str },

    /// The anchor offset is too small to derive a size field from.
    #[error("anchor offset {anchor} is too small to derive an mdat size (need at least {min})")]
    InvalidOffset { anchor: u64, min: u64 },

    /// The buffer is shorter than the header skip plus trailer trim.
    #[error("capture is truncated: {len} bytes, need at least {min}")]
    Truncated { len: usize, min: usize },

    /// Reading or writing a capture failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Anything else, including panics caught while repairing.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Create a not found error for the given marker.
    pub fn not_found(marker: &'static str) -> Self {
        Self::NotFound { marker }
    }

    /// Create an unexpected error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Classify this error for reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::InvalidOffset { .. } => FailureKind::InvalidOffset,
            Self::Truncated { .. } => FailureKind::Truncated,
            Self::Io(_) => FailureKind::Io,
            Self::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

/// Classification of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FailureKind {
    NotFound,
    InvalidOffset,
    Truncated,
    Io,
    Unexpected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidOffset => "invalid_offset",
            Self::Truncated => "truncated",
            Self::Io => "io",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
