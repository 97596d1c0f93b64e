use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{NO_ERROR_MESSAGE, PollError};
use crate::job::{Job, JobStatus};
use crate::kie::KieError;

/// Provider endpoints the poller drives: one call to create a task and one to
/// read its current status.
#[allow(async_fn_in_trait)]
pub trait TaskApi {
    /// Provider-specific creation payload.
    type Request;

    /// Create a task and return its provider-assigned id.
    async fn submit_task(&self, request: &Self::Request) -> Result<String, KieError>;

    /// Fetch and normalize the current status of a task.
    async fn task_status(&self, task_id: &str) -> Result<Job, KieError>;
}

/// Timing for [`JobPoller::wait_until_done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Wall-clock budget for the whole wait.
    pub timeout: Duration,
    /// Fixed delay between status checks.
    pub poll_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(10),
        }
    }
}

impl PollSettings {
    pub fn from_secs(timeout_secs: u64, poll_interval_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }
}

/// Drives a remote long-running job to a terminal state.
///
/// Polling is fixed-interval with no backoff or jitter. Every error is terminal
/// for the call that produced it; a failed status check aborts the wait
/// immediately instead of being retried.
pub struct JobPoller<A> {
    api: A,
}

impl<A: TaskApi> JobPoller<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Send a creation request and return the issued task id.
    pub async fn submit(&self, request: &A::Request) -> Result<String, PollError> {
        let task_id = self
            .api
            .submit_task(request)
            .await
            .map_err(PollError::Submission)?;
        info!(task_id = %task_id, "task submitted");
        Ok(task_id)
    }

    /// Issue a single status check.
    pub async fn fetch_status(&self, task_id: &str) -> Result<Job, PollError> {
        self.api
            .task_status(task_id)
            .await
            .map_err(|source| PollError::StatusFetch {
                task_id: task_id.to_string(),
                source,
            })
    }

    /// Poll until the job completes, fails, or `timeout` elapses.
    ///
    /// The deadline is checked before every fetch, so a zero timeout fails
    /// without contacting the provider. A zero `poll_interval` is rejected
    /// up front.
    pub async fn wait_until_done(
        &self,
        task_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Job, PollError> {
        self.wait_until_done_with(task_id, timeout, poll_interval, |_, _| {})
            .await
    }

    /// Same as [`wait_until_done`](Self::wait_until_done), calling
    /// `on_status` with every fetched snapshot and its 1-based attempt number.
    pub async fn wait_until_done_with<F>(
        &self,
        task_id: &str,
        timeout: Duration,
        poll_interval: Duration,
        mut on_status: F,
    ) -> Result<Job, PollError>
    where
        F: FnMut(&Job, u32),
    {
        if poll_interval.is_zero() {
            return Err(PollError::ZeroPollInterval {
                task_id: task_id.to_string(),
            });
        }

        let start = Instant::now();
        let mut attempts = 0u32;

        while start.elapsed() < timeout {
            attempts += 1;
            let job = self.fetch_status(task_id).await?;
            debug!(task_id, attempt = attempts, status = %job.status, "status checked");
            on_status(&job, attempts);

            match job.status {
                JobStatus::Completed => {
                    info!(task_id, attempts, urls = job.result_urls.len(), "task completed");
                    return Ok(job);
                }
                JobStatus::Failed => {
                    let message = job.error.unwrap_or_else(|| NO_ERROR_MESSAGE.to_string());
                    warn!(task_id, %message, "task failed");
                    return Err(PollError::JobFailed {
                        task_id: task_id.to_string(),
                        message,
                    });
                }
                _ => sleep(poll_interval).await,
            }
        }

        warn!(task_id, attempts, ?timeout, "task timed out");
        Err(PollError::JobTimeout {
            task_id: task_id.to_string(),
            timeout,
            attempts,
        })
    }
}
