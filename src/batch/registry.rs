//! Job registry and lifecycle API.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use super::context::build_topical_map_context;
use super::job::{BatchJob, JobHandle};
use super::publisher::run_publish_phase;
use super::serializer::MutationSerializer;
use super::worker::run_generation_pool;
use crate::config::BatchConfig;
use crate::llm::ContentGenerator;
use crate::publish::CmsPublisher;
use crate::store::DocumentStore;

/// Shared collaborators for batch processing.
#[derive(Clone)]
pub struct BatchDeps {
    pub store: Arc<dyn DocumentStore>,
    pub serializer: Arc<MutationSerializer>,
    pub generator: Arc<dyn ContentGenerator>,
    pub publisher: Arc<dyn CmsPublisher>,
}

impl BatchDeps {
    /// Wire up deps around a store; the mutation serializer is built here so
    /// there is exactly one per process.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn ContentGenerator>,
        publisher: Arc<dyn CmsPublisher>,
    ) -> Self {
        let serializer = Arc::new(MutationSerializer::new(store.clone()));
        Self {
            store,
            serializer,
            generator,
            publisher,
        }
    }
}

/// Process-wide mapping from job id to live job state.
///
/// Created once at startup and handed by `Arc` to anything that starts,
/// inspects, or cancels jobs. Jobs live for the process lifetime; there is no
/// deletion API.
pub struct JobRegistry {
    deps: BatchDeps,
    config: BatchConfig,
    jobs: RwLock<HashMap<Uuid, JobHandle>>,
}

impl JobRegistry {
    pub fn new(deps: BatchDeps, config: BatchConfig) -> Arc<Self> {
        Arc::new(Self {
            deps,
            config,
            jobs: RwLock::new(HashMap::new()),
        })
    }

    /// Create a job and start processing it in the background.
    ///
    /// Returns the new job id immediately; callers poll [`get_job`] for
    /// progress. The caller is responsible for submitting a non-empty list.
    ///
    /// [`get_job`]: JobRegistry::get_job
    pub async fn start_batch(
        &self,
        topic_ids: Vec<Uuid>,
        blog_config_id: Option<Uuid>,
        auto_publish: bool,
    ) -> Uuid {
        let job = JobHandle::new(topic_ids, blog_config_id, auto_publish);
        let job_id = job.id();
        self.jobs.write().await.insert(job_id, job.clone());

        let total = job.snapshot().await.total;
        info!(
            job_id = %job_id,
            total = total,
            auto_publish = auto_publish,
            "Batch job started"
        );

        let deps = self.deps.clone();
        let worker_count = self.config.worker_count;
        tokio::spawn(async move {
            drive(deps, job, worker_count).await;
        });

        job_id
    }

    /// Point-in-time snapshot of a job, or `None` for an unknown id.
    pub async fn get_job(&self, job_id: Uuid) -> Option<BatchJob> {
        let jobs = self.jobs.read().await;
        let job = jobs.get(&job_id)?.clone();
        drop(jobs);
        Some(job.snapshot().await)
    }

    /// Request cancellation. Returns true only if the job existed and was
    /// still running.
    pub async fn cancel_job(&self, job_id: Uuid) -> bool {
        let jobs = self.jobs.read().await;
        let Some(job) = jobs.get(&job_id).cloned() else {
            return false;
        };
        drop(jobs);
        job.cancel().await
    }
}

/// Drive one job through generation, optional publishing, and the terminal
/// transition.
async fn drive(deps: BatchDeps, job: JobHandle, worker_count: usize) {
    let snapshot = job.snapshot().await;

    let map_context = match build_topical_map_context(
        &deps.store,
        &snapshot.topic_ids,
        snapshot.blog_config_id,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(e) => {
            // Guard: a setup failure must still drive the job to a terminal
            // state, never leave it running forever.
            error!(job_id = %job.id(), error = %e, "Batch setup failed");
            job.finish().await;
            return;
        }
    };

    run_generation_pool(&deps, &job, map_context, worker_count).await;

    if snapshot.auto_publish == Some(true) && !job.is_cancelled().await {
        run_publish_phase(&deps, &job).await;
    }

    let status = job.finish().await;
    let done = job.snapshot().await;
    info!(
        job_id = %job.id(),
        status = %status,
        completed = done.completed,
        failed = done.failed,
        "Batch job finished"
    );
}
