use std::time::Duration;

use thiserror::Error;

use crate::kie::KieError;

/// Message used when a provider reports failure without saying why.
pub const NO_ERROR_MESSAGE: &str = "no error message provided";

/// Terminal outcomes of submitting and waiting on a remote job.
///
/// None of these are retried by the poller; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum PollError {
    /// The creation request was rejected, malformed, or returned no task id.
    #[error("submission failed: {0}")]
    Submission(#[source] KieError),

    /// A single status check failed at the transport, HTTP, or parse level.
    #[error("status check for task {task_id} failed: {source}")]
    StatusFetch {
        task_id: String,
        #[source]
        source: KieError,
    },

    /// The provider reported the job as failed.
    #[error("task {task_id} failed: {message}")]
    JobFailed { task_id: String, message: String },

    /// The wait was asked to poll with a zero interval.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval { task_id: String },

    /// The local deadline passed while the job was still non-terminal.
    #[error("task {task_id} timed out after {}s ({attempts} status checks)", .timeout.as_secs_f64())]
    JobTimeout {
        task_id: String,
        timeout: Duration,
        attempts: u32,
    },
}

impl PollError {
    /// Task the error refers to, when one had been issued.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            PollError::Submission(_) => None,
            PollError::StatusFetch { task_id, .. }
            | PollError::JobFailed { task_id, .. }
            | PollError::ZeroPollInterval { task_id }
            | PollError::JobTimeout { task_id, .. } => Some(task_id),
        }
    }
}
