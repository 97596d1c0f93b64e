use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a remote generation task.
///
/// Providers report status with their own vocabulary; [`JobStatus::normalize`]
/// folds the known spellings into the four canonical states. Anything else is
/// kept verbatim in [`JobStatus::Other`] so callers can still inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(untagged)]
    Other(String),
}

impl JobStatus {
    /// Map a provider status string onto the closed status set.
    ///
    /// Matching is case-insensitive. Unrecognized values pass through
    /// unchanged, original casing included.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "waiting" | "queuing" | "queued" => JobStatus::Pending,
            "processing" | "generating" | "running" | "in_progress" => JobStatus::Processing,
            "completed" | "success" | "succeeded" => JobStatus::Completed,
            "failed" | "fail" | "error" => JobStatus::Failed,
            _ => JobStatus::Other(raw.to_string()),
        }
    }

    /// `Completed` and `Failed` are terminal; no further transitions follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Snapshot of a remote task as reported by one status check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub task_id: String,
    pub status: JobStatus,
    pub result_urls: Vec<String>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl Job {
    /// Build a job snapshot. Result URLs are only kept for completed jobs and
    /// the error message only for failed ones.
    pub fn new(
        task_id: String,
        status: JobStatus,
        result_urls: Vec<String>,
        error: Option<String>,
    ) -> Self {
        let result_urls = if status == JobStatus::Completed {
            result_urls
        } else {
            Vec::new()
        };
        let error = if status == JobStatus::Failed {
            error
        } else {
            None
        };
        Self {
            task_id,
            status,
            result_urls,
            error,
            checked_at: Utc::now(),
        }
    }

    /// A freshly submitted task that has not been checked yet.
    pub fn submitted(task_id: String) -> Self {
        Self::new(task_id, JobStatus::Pending, Vec::new(), None)
    }

    /// First result URL, if the job completed with any output.
    pub fn primary_url(&self) -> Option<&str> {
        self.result_urls.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vocabulary_normalizes() {
        let table = [
            ("pending", JobStatus::Pending),
            ("waiting", JobStatus::Pending),
            ("queuing", JobStatus::Pending),
            ("queued", JobStatus::Pending),
            ("processing", JobStatus::Processing),
            ("generating", JobStatus::Processing),
            ("running", JobStatus::Processing),
            ("in_progress", JobStatus::Processing),
            ("completed", JobStatus::Completed),
            ("success", JobStatus::Completed),
            ("succeeded", JobStatus::Completed),
            ("failed", JobStatus::Failed),
            ("fail", JobStatus::Failed),
            ("error", JobStatus::Failed),
        ];
        for (raw, expected) in table {
            assert_eq!(JobStatus::normalize(raw), expected, "raw status {raw:?}");
        }
    }

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        assert_eq!(JobStatus::normalize("SUCCESS"), JobStatus::Completed);
        assert_eq!(JobStatus::normalize("  Failed "), JobStatus::Failed);
    }

    #[test]
    fn unknown_status_passes_through_unchanged() {
        assert_eq!(
            JobStatus::normalize("Throttled"),
            JobStatus::Other("Throttled".into())
        );
        assert_eq!(JobStatus::normalize("Throttled").to_string(), "Throttled");
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Other("unknown".into()).is_terminal());
    }

    #[test]
    fn result_urls_dropped_unless_completed() {
        let job = Job::new(
            "t1".into(),
            JobStatus::Processing,
            vec!["https://cdn.example/v.mp4".into()],
            Some("boom".into()),
        );
        assert!(job.result_urls.is_empty());
        assert!(job.error.is_none());
        assert_eq!(job.primary_url(), None);
    }

    #[test]
    fn completed_job_keeps_urls_but_not_error() {
        let job = Job::new(
            "t2".into(),
            JobStatus::Completed,
            vec!["https://cdn.example/a.mp4".into(), "https://cdn.example/b.mp4".into()],
            Some("stale".into()),
        );
        assert_eq!(job.result_urls.len(), 2);
        assert_eq!(job.primary_url(), Some("https://cdn.example/a.mp4"));
        assert!(job.error.is_none());
    }

    #[test]
    fn failed_job_keeps_error_only() {
        let job = Job::new(
            "t3".into(),
            JobStatus::Failed,
            vec!["https://cdn.example/partial.mp4".into()],
            Some("content policy violation".into()),
        );
        assert!(job.result_urls.is_empty());
        assert_eq!(job.error.as_deref(), Some("content policy violation"));
    }

    #[test]
    fn submitted_job_is_pending() {
        let job = Job::submitted("abc".into());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.task_id, "abc");
    }

    #[test]
    fn status_serializes_lowercase_and_raw() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            r#""completed""#
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Other("Throttled".into())).unwrap(),
            r#""Throttled""#
        );
        let parsed: JobStatus = serde_json::from_str(r#""processing""#).unwrap();
        assert_eq!(parsed, JobStatus::Processing);
        let parsed: JobStatus = serde_json::from_str(r#""mystery""#).unwrap();
        assert_eq!(parsed, JobStatus::Other("mystery".into()));
    }
}
