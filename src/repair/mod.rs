//! Batch repair of a directory of corrupted captures.
//!
//! [`repair_directory`] runs synchronously and reports through an
//! [`EventSink`]. [`RepairWorker`] runs the same batch on a blocking worker
//! thread and streams events over a channel.

mod error;
mod events;
mod report;
mod worker;

pub use error::BatchError;
pub use events::{EventSink, RepairEvent, TracingSink};
pub use report::{BatchReport, RepairResult};
pub use worker::{RepairTask, RepairWorker};

use crate::config::{Config, OutputConfig, ScanConfig};
use chrono::Utc;
use moovmend_core::{CorruptedCapture, DeviceProfile, ReferenceCapture};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Everything a batch needs to run.
#[derive(Debug, Clone)]
pub struct RepairJob {
    pub corrupted_dir: PathBuf,
    pub reference: PathBuf,
    pub output_dir: PathBuf,
    pub profile: DeviceProfile,
    pub output: OutputConfig,
    pub scan: ScanConfig,
}

impl RepairJob {
    /// Job writing into `<corrupted_dir>/<output.dir_name>`.
    pub fn new(
        corrupted_dir: impl Into<PathBuf>,
        reference: impl Into<PathBuf>,
        config: &Config,
    ) -> Self {
        let corrupted_dir = corrupted_dir.into();
        let output_dir = corrupted_dir.join(&config.output.dir_name);
        Self {
            corrupted_dir,
            reference: reference.into(),
            output_dir,
            profile: config.profile,
            output: config.output.clone(),
            scan: config.scan.clone(),
        }
    }

    /// Write artifacts somewhere else.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Repair every candidate in `job.corrupted_dir`.
///
/// A missing reference, an output directory that cannot be created or that
/// resolves to the input directory, and an unlistable input directory abort
/// the batch. Each file's failure is reported through `sink` and recorded in
/// the returned report.
///
/// Two candidates that map to the same artifact name (`C0001.MP4` and
/// `C0001.MOV`) never share an output: the later one fails with an I/O error
/// and nothing is written for it.
pub fn repair_directory(
    job: &RepairJob,
    sink: &mut dyn EventSink,
) -> Result<BatchReport, BatchError> {
    ReferenceCapture::open(&job.reference).map_err(|source| BatchError::ReferenceMissing {
        path: job.reference.clone(),
        source,
    })?;

    std::fs::create_dir_all(&job.output_dir).map_err(|source| BatchError::CreateOutputDir {
        path: job.output_dir.clone(),
        source,
    })?;
    check_output_dir(job)?;

    let candidates = list_candidates(&job.corrupted_dir, &job.scan)?;
    let total = candidates.len();

    tracing::info!(
        "Repairing {} file(s) from {:?} into {:?}",
        total,
        job.corrupted_dir,
        job.output_dir
    );

    let mut report = BatchReport::new(job.output_dir.clone());
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    sink.emit(RepairEvent::Started { total });

    for (index, file) in candidates.into_iter().enumerate() {
        sink.emit(RepairEvent::Processing {
            index,
            total,
            file: file.clone(),
        });

        let outcome = run_guarded(|| {
            let destination = artifact_path(&file, &job.output_dir, &job.output)?;
            if claimed.contains(&destination) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!(
                        "{} was already written by another file in this batch",
                        destination.display()
                    ),
                )
                .into());
            }
            repair_file(&file, &job.output_dir, &job.profile, &job.output)
        });

        let (result, event) = match outcome {
            Ok(output) => {
                tracing::info!("Repaired {:?} -> {:?}", file, output);
                claimed.insert(output.clone());
                (
                    RepairResult::Repaired {
                        file: file.clone(),
                        output: output.clone(),
                    },
                    RepairEvent::Repaired { file, output },
                )
            }
            Err(e) => {
                tracing::warn!("Failed to repair {:?}: {}", file, e);
                let kind = e.kind();
                let message = e.to_string();
                (
                    RepairResult::Failed {
                        file: file.clone(),
                        kind,
                        message: message.clone(),
                    },
                    RepairEvent::Failed {
                        file,
                        kind,
                        message,
                    },
                )
            }
        };

        sink.emit(event);
        report.results.push(result);
    }

    report.finished_at = Utc::now();
    sink.emit(RepairEvent::Finished {
        report: report.clone(),
    });

    Ok(report)
}

/// Reject an output directory that is the input directory itself.
///
/// Artifacts written there would replace candidates whose extension matches
/// the temporary extension.
fn check_output_dir(job: &RepairJob) -> Result<(), BatchError> {
    let output = std::fs::canonicalize(&job.output_dir);
    let input = std::fs::canonicalize(&job.corrupted_dir);
    if let (Ok(output), Ok(input)) = (output, input) {
        if output == input {
            return Err(BatchError::OutputIsInput { path: output });
        }
    }
    Ok(())
}

/// Path of the artifact `repair_file` writes for `file`.
fn artifact_path(
    file: &Path,
    output_dir: &Path,
    output: &OutputConfig,
) -> moovmend_core::Result<PathBuf> {
    let base_name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| moovmend_core::Error::unexpected(format!("no file name in {:?}", file)))?;
    if output.strip_extension {
        Ok(output_dir.join(base_name))
    } else {
        Ok(output_dir.join(format!("{}.{}", base_name, output.temp_extension)))
    }
}

/// Run one file's repair, turning a panic into an `Unexpected` failure.
fn run_guarded<F>(repair: F) -> moovmend_core::Result<PathBuf>
where
    F: FnOnce() -> moovmend_core::Result<PathBuf>,
{
    panic::catch_unwind(AssertUnwindSafe(repair)).unwrap_or_else(|payload| {
        Err(moovmend_core::Error::unexpected(panic_message(&*payload)))
    })
}

/// Regular files in `dir` accepted by the scan filter, sorted by name.
fn list_candidates(dir: &Path, scan: &ScanConfig) -> Result<Vec<PathBuf>, BatchError> {
    let list_err = |source: std::io::Error| BatchError::ListInput {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        if !path.is_file() {
            continue;
        }
        if !scan.accepts(&path) {
            tracing::debug!("Skipping {:?}: extension not in scan filter", path);
            continue;
        }
        candidates.push(path);
    }

    candidates.sort();
    Ok(candidates)
}

/// Repair a single capture and write the artifact into `output_dir`.
///
/// The stream is written as `<base>.<temp_extension>` and then, when
/// `strip_extension` is set, renamed to `<base>`. Nothing is left behind on
/// failure.
pub fn repair_file(
    file: &Path,
    output_dir: &Path,
    profile: &DeviceProfile,
    output: &OutputConfig,
) -> moovmend_core::Result<PathBuf> {
    let capture = CorruptedCapture::read(file)?;
    let base_name = capture.base_name()?;
    tracing::debug!("Loaded {:?} ({} bytes)", file, capture.len());

    let repaired = capture.repair(profile)?;
    drop(capture);

    let written = output_dir.join(format!("{}.{}", base_name, output.temp_extension));
    if let Err(e) = std::fs::write(&written, &repaired) {
        let _ = std::fs::remove_file(&written);
        return Err(e.into());
    }
    drop(repaired);

    if !output.strip_extension {
        return Ok(written);
    }

    let final_path = output_dir.join(&base_name);
    if final_path.exists() {
        tracing::warn!("Replacing artifact from an earlier run {:?}", final_path);
    }
    if let Err(e) = std::fs::rename(&written, &final_path) {
        let _ = std::fs::remove_file(&written);
        return Err(e.into());
    }

    Ok(final_path)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic while repairing: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic while repairing: {}", msg)
    } else {
        "panic while repairing".to_string()
    }
}
