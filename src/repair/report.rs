//! Per-file results and the batch summary.

use chrono::{DateTime, Utc};
use moovmend_core::FailureKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one candidate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepairResult {
    Repaired {
        file: PathBuf,
        output: PathBuf,
    },
    Failed {
        file: PathBuf,
        kind: FailureKind,
        message: String,
    },
}

impl RepairResult {
    pub fn file(&self) -> &std::path::Path {
        match self {
            Self::Repaired { file, .. } | Self::Failed { file, .. } => file,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Repaired { .. })
    }
}

/// Summary of a finished batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<RepairResult>,
}

impl BatchReport {
    pub(crate) fn new(output_dir: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            output_dir,
            started_at: now,
            finished_at: now,
            results: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RepairResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Paths of every artifact written.
    pub fn outputs(&self) -> impl Iterator<Item = &std::path::Path> {
        self.results.iter().filter_map(|r| match r {
            RepairResult::Repaired { output, .. } => Some(output.as_path()),
            RepairResult::Failed { .. } => None,
        })
    }
}
