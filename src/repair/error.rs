//! Errors that abort a whole batch.

use std::io;
use std::path::PathBuf;

/// Directory-level failure. Per-file failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The reference capture is missing or not a regular file.
    #[error("reference file not found: {}", path.display())]
    ReferenceMissing {
        path: PathBuf,
        #[source]
        source: moovmend_core::Error,
    },

    /// The output directory could not be created.
    #[error("cannot create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output directory resolves to the input directory.
    #[error("output directory {} is the input directory", path.display())]
    OutputIsInput { path: PathBuf },

    /// The input directory could not be listed.
    #[error("cannot list input directory {}: {source}", path.display())]
    ListInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background worker died before returning a report.
    #[error("repair worker failed: {0}")]
    WorkerPanicked(String),
}
