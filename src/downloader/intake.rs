//! Intake loop -- reads identifiers and spawns one job per identifier.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::task::TaskTracker;

use super::job::{JobContext, run_job};
use super::{Downloader, RunReport};
use crate::types::FileId;

/// Extract the identifier from one input line, `None` for blank lines
pub(crate) fn parse_identifier(line: &str) -> Option<FileId> {
    let id = line.trim();
    if id.is_empty() {
        None
    } else {
        Some(FileId::from(id))
    }
}

impl Downloader {
    /// Process identifiers from `input`, one per line, until it is exhausted.
    ///
    /// For each non-empty line the loop:
    /// 1. Waits for an admission permit (blocks while the ceiling is reached)
    /// 2. Spawns a job that holds the permit until it succeeds or fails
    ///
    /// Blank lines are skipped. A read error ends intake like end-of-input does.
    /// Returns once intake has ended and every spawned job has finished; job
    /// failures are logged by the job and never surface here.
    pub async fn run<R>(&self, input: R) -> RunReport
    where
        R: AsyncBufRead + Unpin,
    {
        let tracker = TaskTracker::new();
        let mut lines = input.lines();
        let mut report = RunReport::default();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to read input, no further identifiers will be accepted"
                    );
                    break;
                }
            };

            let Some(id) = parse_identifier(&line) else {
                continue;
            };

            let permit = match Arc::clone(&self.admission).acquire_owned().await {
                Ok(p) => p,
                Err(_) => {
                    tracing::error!(file_id = %id, "Admission semaphore closed, stopping intake");
                    break;
                }
            };

            report.admitted += 1;
            tracing::trace!(file_id = %id, "Admitted job");

            let ctx = JobContext {
                id,
                transport: Arc::clone(&self.transport),
                config: Arc::clone(&self.config),
            };

            tracker.spawn(async move {
                let _permit = permit;
                run_job(ctx).await;
            });
        }

        tracker.close();
        tracing::debug!(
            admitted = report.admitted,
            running = tracker.len(),
            "Input closed, waiting for running jobs"
        );
        tracker.wait().await;

        report
    }
}
