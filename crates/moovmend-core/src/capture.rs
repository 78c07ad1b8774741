//! Capture files loaded for repair.

use crate::locator::locate_moov;
use crate::reconstruct::{inspect, reconstruct, RepairPlan};
use crate::{DeviceProfile, Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// A corrupted capture read fully into memory.
#[derive(Debug, Clone)]
pub struct CorruptedCapture {
    path: PathBuf,
    data: Bytes,
}

impl CorruptedCapture {
    /// Read the whole file at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Ok(Self::from_bytes(path, data))
    }

    /// Wrap an in-memory buffer.
    pub fn from_bytes(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File name without its extension, used to name the repaired output.
    pub fn base_name(&self) -> Result<String> {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::unexpected(format!("no file name in {:?}", self.path)))
    }

    /// Locate the anchor and build the repaired stream.
    pub fn repair(&self, profile: &DeviceProfile) -> Result<Bytes> {
        let anchor = locate_moov(&self.data)?;
        reconstruct(&self.data, anchor, profile)
    }

    /// Describe the repair without performing it.
    pub fn plan(&self, profile: &DeviceProfile) -> Result<RepairPlan> {
        inspect(&self.data, profile)
    }
}

/// A known-good capture from the same device.
///
/// Only its presence is checked. Its contents are not used to derive a
/// [`DeviceProfile`].
#[derive(Debug, Clone)]
pub struct ReferenceCapture {
    path: PathBuf,
    len: u64,
}

impl ReferenceCapture {
    /// Check that `path` exists and is a regular file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("reference {:?} is not a regular file", path),
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
