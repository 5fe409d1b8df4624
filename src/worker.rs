//! Runs one search job off the async runtime and reports batches as
//! messages. Only [`JobMessage`]s and the [`CancelToken`] cross the boundary.

use crate::algorithm::{CancelToken, find_assignments};
use crate::api_json::{JobMessage, SearchJob};
use serde::Serialize;
use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

/// Batches buffered between a worker and its reader. A full channel blocks
/// the worker until the reader catches up.
pub const MESSAGE_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub batches: u64,
    pub plans_examined: u64,
    pub configurations: u64,
    pub cancelled: bool,
}

/// Runs `job` to completion on the current thread.
///
/// Assignments in the input plan that point into the tree are cleared
/// first. Every improvement goes to `sink` as a [`JobMessage::Batch`],
/// followed by [`JobMessage::Done`] unless the job was cancelled. A `sink`
/// returning `false` cancels the job.
pub fn run_job<F>(job: SearchJob, cancel: CancelToken, mut sink: F) -> JobSummary
where
    F: FnMut(JobMessage) -> bool,
{
    let SearchJob {
        tree,
        plan,
        fixed_selections,
        options,
        ..
    } = job;
    let fixed = fixed_selections.unwrap_or_else(|| plan.selections().clone());
    let plan = plan.without_assignments_into(&tree);

    let mut search = find_assignments(&tree, plan, &fixed, options, cancel.clone());
    let mut batches = 0u64;
    for batch in search.by_ref() {
        batches += 1;
        let plans = batch.into_iter().map(|entry| entry.plan).collect();
        if !sink(JobMessage::Batch { plans }) {
            debug!(batches, "[worker] receiver gone, cancelling");
            cancel.cancel();
            break;
        }
    }

    let stats = search.stats();
    let cancelled = cancel.is_cancelled();
    if !cancelled {
        sink(JobMessage::Done);
    }
    let summary = JobSummary {
        batches,
        plans_examined: stats.plans_examined,
        configurations: stats.configurations,
        cancelled,
    };
    info!(
        batches = summary.batches,
        plans_examined = summary.plans_examined,
        configurations = summary.configurations,
        cancelled = summary.cancelled,
        "✅ [worker] job finished"
    );
    summary
}

/// A job running on a blocking worker thread. Dropping the handle cancels
/// the job.
pub struct SearchHandle {
    messages: Receiver<JobMessage>,
    cancel: CancelToken,
    task: JoinHandle<JobSummary>,
}

impl SearchHandle {
    pub async fn next_message(&mut self) -> Option<JobMessage> {
        self.messages.recv().await
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Waits for the worker to return its summary.
    pub async fn finish(mut self) -> Result<JobSummary, JoinError> {
        (&mut self.task).await
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts `job` with `tokio::task::spawn_blocking`. The permit, if any, is
/// held until the worker returns.
pub fn spawn_job(job: SearchJob, permit: Option<OwnedSemaphorePermit>) -> SearchHandle {
    spawn_job_with_buffer(job, permit, MESSAGE_BUFFER)
}

/// Like [`spawn_job`], with at most `buffer` undelivered messages.
pub fn spawn_job_with_buffer(job: SearchJob, permit: Option<OwnedSemaphorePermit>, buffer: usize) -> SearchHandle {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        run_job(job, worker_cancel, |message| tx.blocking_send(message).is_ok())
    });
    SearchHandle {
        messages: rx,
        cancel,
        task,
    }
}
