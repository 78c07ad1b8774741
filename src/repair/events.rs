//! Per-file progress events and the sinks that consume them.

use super::report::BatchReport;
use moovmend_core::FailureKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Event emitted while a batch runs.
///
/// Exactly one `Processing` event precedes the `Repaired` or `Failed`
/// event of each candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RepairEvent {
    /// The candidate list has been built.
    Started { total: usize },
    /// Repair of a file has begun. `index` is zero-based.
    Processing {
        index: usize,
        total: usize,
        file: PathBuf,
    },
    /// A file was repaired and written.
    Repaired { file: PathBuf, output: PathBuf },
    /// A file could not be repaired; the batch continues.
    Failed {
        file: PathBuf,
        kind: FailureKind,
        message: String,
    },
    /// The batch ran to completion.
    Finished { report: BatchReport },
}

impl RepairEvent {
    /// Fraction of candidates started so far, for progress displays.
    pub fn progress(&self) -> Option<f32> {
        match self {
            Self::Started { .. } => Some(0.0),
            Self::Processing { index, total, .. } if *total > 0 => {
                Some(*index as f32 / *total as f32)
            }
            Self::Finished { .. } => Some(1.0),
            _ => None,
        }
    }

    /// Whether this event reports a per-file failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Human-readable log line for this event.
    pub fn log_line(&self) -> String {
        match self {
            Self::Started { total } => format!("Found {} file(s) to repair", total),
            Self::Processing {
                index, total, file, ..
            } => format!("[{}/{}] Processing {}...", index + 1, total, display_name(file)),
            Self::Repaired { file, output } => {
                format!("{} repaired -> {}", display_name(file), output.display())
            }
            Self::Failed {
                file,
                kind,
                message,
            } => format!("Error ({}): {}: {}", kind, display_name(file), message),
            Self::Finished { report } => format!(
                "Done: {} attempted, {} repaired, {} failed",
                report.attempted(),
                report.succeeded(),
                report.failed()
            ),
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Consumer of [`RepairEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: RepairEvent);
}

impl<F: FnMut(RepairEvent)> EventSink for F {
    fn emit(&mut self, event: RepairEvent) {
        self(event);
    }
}

impl EventSink for Vec<RepairEvent> {
    fn emit(&mut self, event: RepairEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::UnboundedSender<RepairEvent> {
    fn emit(&mut self, event: RepairEvent) {
        if self.send(event).is_err() {
            tracing::debug!("No receiver for repair event");
        }
    }
}

/// Sink that only forwards events to `tracing`.
///
/// Used when stdout is reserved for machine-readable output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: RepairEvent) {
        if event.is_error() {
            tracing::warn!("{}", event.log_line());
        } else {
            tracing::info!("{}", event.log_line());
        }
    }
}
