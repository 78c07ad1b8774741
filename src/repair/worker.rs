//! Background execution of a batch.

use super::{repair_directory, BatchError, BatchReport, RepairEvent, RepairJob};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A batch running on a blocking worker thread.
///
/// Drain [`RepairTask::events`] for progress, then [`RepairTask::join`] for
/// the report. The channel closes once the worker returns. A started batch
/// cannot be cancelled.
pub struct RepairTask {
    pub events: mpsc::UnboundedReceiver<RepairEvent>,
    handle: JoinHandle<Result<BatchReport, BatchError>>,
}

impl RepairTask {
    /// Wait for the worker to finish.
    pub async fn join(self) -> Result<BatchReport, BatchError> {
        self.handle
            .await
            .map_err(|e| BatchError::WorkerPanicked(e.to_string()))?
    }

    /// Forward every event to `on_event`, then wait for the report.
    pub async fn run_to_completion<F>(mut self, mut on_event: F) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&RepairEvent),
    {
        while let Some(event) = self.events.recv().await {
            on_event(&event);
        }
        self.join().await
    }
}

/// Spawns batches off the async runtime.
pub struct RepairWorker;

impl RepairWorker {
    /// Start `job` on the runtime's blocking pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(job: RepairJob) -> RepairTask {
        let (mut tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::task::spawn_blocking(move || {
            tracing::debug!("Repair worker started for {:?}", job.corrupted_dir);
            let result = repair_directory(&job, &mut tx);
            if let Err(ref e) = result {
                tracing::error!("Repair batch aborted: {}", e);
            }
            result
        });

        RepairTask { events: rx, handle }
    }
}
