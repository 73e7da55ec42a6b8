//! Batch job record and state machine.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Job lifecycle: `Running` is initial, the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One failed item: which topic, and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFailure {
    pub topic_id: Uuid,
    pub error: String,
}

/// A batch job's tracked state. Snapshots of this are what callers poll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    pub id: Uuid,
    pub topic_ids: Vec<Uuid>,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
    pub status: JobStatus,
    pub errors: Vec<JobFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_config_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_publish: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_errors: Option<Vec<JobFailure>>,
}

/// Shared handle to a live job.
///
/// All mutation goes through these methods so counter updates and status
/// transitions stay behind one lock; the runtime is multi-threaded tokio, so
/// bare increments would race.
#[derive(Clone)]
pub struct JobHandle {
    id: Uuid,
    inner: Arc<RwLock<BatchJob>>,
}

impl JobHandle {
    /// Create a new job in `Running` state with zeroed counters.
    ///
    /// The publish-tracking fields are present only when auto-publish was
    /// requested.
    pub fn new(topic_ids: Vec<Uuid>, blog_config_id: Option<Uuid>, auto_publish: bool) -> Self {
        let id = Uuid::new_v4();
        let total = topic_ids.len();
        let job = BatchJob {
            id,
            topic_ids,
            completed: 0,
            failed: 0,
            total,
            status: JobStatus::Running,
            errors: Vec::new(),
            blog_config_id,
            auto_publish: auto_publish.then_some(true),
            published_count: auto_publish.then_some(0),
            publish_errors: auto_publish.then(Vec::new),
        };
        Self {
            id,
            inner: Arc::new(RwLock::new(job)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Point-in-time copy of the job state.
    pub async fn snapshot(&self) -> BatchJob {
        self.inner.read().await.clone()
    }

    pub async fn status(&self) -> JobStatus {
        self.inner.read().await.status
    }

    pub async fn is_cancelled(&self) -> bool {
        self.inner.read().await.status == JobStatus::Cancelled
    }

    /// Request cancellation. Succeeds only from `Running`; a job already in a
    /// terminal state is left untouched.
    pub async fn cancel(&self) -> bool {
        let mut job = self.inner.write().await;
        if job.status != JobStatus::Running {
            return false;
        }
        job.status = JobStatus::Cancelled;
        info!(job_id = %self.id, "Batch job cancelled");
        true
    }

    /// Terminal transition once processing is done: `Running` becomes
    /// `Completed`; a cancellation observed earlier is never overridden.
    pub async fn finish(&self) -> JobStatus {
        let mut job = self.inner.write().await;
        if job.status == JobStatus::Running {
            job.status = JobStatus::Completed;
        }
        job.status
    }

    pub async fn record_success(&self) {
        let mut job = self.inner.write().await;
        job.completed += 1;
        debug_assert!(job.completed + job.failed <= job.total);
    }

    pub async fn record_failure(&self, topic_id: Uuid, error: String) {
        let mut job = self.inner.write().await;
        job.failed += 1;
        job.errors.push(JobFailure { topic_id, error });
        debug_assert!(job.completed + job.failed <= job.total);
    }

    pub async fn record_publish_success(&self) {
        let mut job = self.inner.write().await;
        *job.published_count.get_or_insert(0) += 1;
    }

    pub async fn record_publish_failure(&self, topic_id: Uuid, error: String) {
        let mut job = self.inner.write().await;
        job.publish_errors
            .get_or_insert_with(Vec::new)
            .push(JobFailure { topic_id, error });
    }
}
