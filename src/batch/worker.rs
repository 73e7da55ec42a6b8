//! Generation worker pool.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::job::JobHandle;
use super::registry::BatchDeps;
use crate::error::{LlmError, StoreError};
use crate::llm::{ClusterHints, GenerationRequest};
use crate::store::model::{DraftPost, DraftStatus, TopicStatus, TopicalMapContext};

/// Per-item failure. Display strings land verbatim in the job's error log.
#[derive(Debug, thiserror::Error)]
enum ItemError {
    #[error("Topic not found")]
    TopicNotFound,

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Generation(#[from] LlmError),
}

/// Drain the job's topic queue with a bounded pool of concurrent workers.
///
/// Every worker loops: observe cancellation at loop top, atomically pop the
/// next topic id, process it, and fold the outcome into the job's counters.
/// Per-item errors are absorbed here; nothing escapes to halt the pool. All
/// workers are awaited before the generation phase counts as finished.
pub async fn run_generation_pool(
    deps: &BatchDeps,
    job: &JobHandle,
    map_context: Option<TopicalMapContext>,
    worker_count: usize,
) {
    let snapshot = job.snapshot().await;
    let blog_config_id = snapshot.blog_config_id;
    let queue = Arc::new(Mutex::new(VecDeque::from(snapshot.topic_ids)));
    let map_context = Arc::new(map_context);

    let workers = (0..worker_count.max(1)).map(|_| {
        let queue = queue.clone();
        let map_context = map_context.clone();
        async move {
            loop {
                if job.is_cancelled().await {
                    debug!(job_id = %job.id(), "Worker stopping: job cancelled");
                    return;
                }
                let Some(topic_id) = queue.lock().await.pop_front() else {
                    return;
                };

                match process_topic(deps, topic_id, blog_config_id, &map_context).await {
                    Ok(()) => job.record_success().await,
                    Err(e) => {
                        warn!(
                            job_id = %job.id(),
                            topic_id = %topic_id,
                            error = %e,
                            "Topic generation failed"
                        );
                        job.record_failure(topic_id, e.to_string()).await;
                    }
                }
            }
        }
    });

    join_all(workers).await;
}

/// One generation-and-persist unit of work.
async fn process_topic(
    deps: &BatchDeps,
    topic_id: Uuid,
    blog_config_id: Option<Uuid>,
    map_context: &Option<TopicalMapContext>,
) -> Result<(), ItemError> {
    let schema = deps.store.load().await?;
    let topic = schema.topic(topic_id).ok_or(ItemError::TopicNotFound)?;
    let config = blog_config_id.and_then(|id| schema.blog_config(id));

    let cluster = topic.role.and_then(|role| {
        map_context.as_ref().map(|map| ClusterHints {
            map: map.clone(),
            topic_id,
            role,
        })
    });

    let request = GenerationRequest {
        title: topic.title.clone(),
        outline: topic.outline.clone(),
        content_prompt: topic.content_prompt.clone(),
        website_context: config.and_then(|c| c.website_context.clone()),
        cluster,
    };
    let generated = deps.generator.generate(&request).await?;

    let now = Utc::now();
    let draft = DraftPost {
        id: Uuid::new_v4(),
        topic_id,
        title: topic.title.clone(),
        slug: topic.slug.clone(),
        content: generated.content,
        meta_title: Some(generated.meta_title),
        meta_description: Some(generated.meta_description),
        excerpt: Some(generated.excerpt),
        status: DraftStatus::Draft,
        published_to: None,
        published_at: None,
        created_at: now,
        updated_at: now,
    };

    // Draft insert and topic status flip are one atomic mutation
    deps.serializer
        .run_exclusive(move |schema| {
            schema.drafts.push(draft);
            if let Some(topic) = schema.topic_mut(topic_id) {
                topic.status = TopicStatus::Generated;
            }
        })
        .await?;

    debug!(topic_id = %topic_id, "Topic generated");
    Ok(())
}
