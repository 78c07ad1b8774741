//! Shared fixtures for integration tests.
//!
//! [`Fixture`] lays out a temporary card dump: a directory of corrupted
//! captures, a reference capture next to it and an output path that does
//! not exist yet.

#![allow(dead_code)]

use moovmend::config::Config;
use moovmend::repair::RepairJob;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    pub root: TempDir,
    pub corrupted: PathBuf,
    pub reference: PathBuf,
    pub output: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        let corrupted = root.path().join("Corrupted");
        std::fs::create_dir(&corrupted).expect("failed to create input dir");

        let reference = root.path().join("reference.MP4");
        std::fs::write(&reference, b"\0\0\0\x18ftypXAVC").expect("failed to write reference");

        let output = root.path().join("Repaired");

        Self {
            root,
            corrupted,
            reference,
            output,
        }
    }

    /// Job with default config writing into [`Fixture::output`].
    pub fn job(&self) -> RepairJob {
        RepairJob::new(&self.corrupted, &self.reference, &Config::default())
            .with_output_dir(&self.output)
    }
}

/// Capture bytes: `prefix_len` filler bytes, a `moov` tag, then a payload
/// that never spells a tag.
pub fn capture_bytes(prefix_len: usize, payload_len: usize) -> Vec<u8> {
    let mut buf = vec![0xEEu8; prefix_len];
    buf.extend_from_slice(b"moov");
    buf.extend((0..payload_len).map(|i| (i % 200) as u8));
    buf
}

pub fn write_capture(dir: &Path, name: &str, prefix_len: usize, payload_len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, capture_bytes(prefix_len, payload_len)).expect("failed to write capture");
    path
}

/// A file without any `moov` tag.
pub fn write_garbage(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0x11u8; len]).expect("failed to write capture");
    path
}
