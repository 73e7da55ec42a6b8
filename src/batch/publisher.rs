//! Auto-publish phase.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::job::JobHandle;
use super::registry::BatchDeps;
use crate::store::model::{DraftPost, DraftStatus};

/// Republish every draft this job generated to the configured CMS target.
///
/// Runs only after the generation phase. The pass is sequential; cancellation
/// is observed before each attempt, and a failed publish is recorded and
/// skipped over rather than ending the pass. A blog-config id that no longer
/// resolves skips the whole phase silently — publishing was optional.
pub async fn run_publish_phase(deps: &BatchDeps, job: &JobHandle) {
    let snapshot = job.snapshot().await;
    let Some(config_id) = snapshot.blog_config_id else {
        return;
    };

    let schema = match deps.store.load().await {
        Ok(schema) => schema,
        Err(e) => {
            error!(job_id = %job.id(), error = %e, "Publish phase could not read store");
            return;
        }
    };
    let Some(config) = schema.blog_config(config_id) else {
        debug!(job_id = %job.id(), config_id = %config_id, "Blog config missing, skipping publish phase");
        return;
    };

    let drafts: Vec<DraftPost> = schema
        .drafts
        .iter()
        .filter(|d| d.status == DraftStatus::Draft && snapshot.topic_ids.contains(&d.topic_id))
        .cloned()
        .collect();

    info!(job_id = %job.id(), count = drafts.len(), "Auto-publishing generated drafts");

    for draft in drafts {
        if job.is_cancelled().await {
            debug!(job_id = %job.id(), "Publish phase stopping: job cancelled");
            break;
        }

        match deps.publisher.publish(&draft, config).await {
            Ok(receipt) => {
                let draft_id = draft.id;
                let persisted = deps
                    .serializer
                    .run_exclusive(move |schema| {
                        if let Some(d) = schema.draft_mut(draft_id) {
                            d.status = DraftStatus::Published;
                            d.published_to = Some(config_id);
                            d.published_at = Some(Utc::now());
                            d.updated_at = Utc::now();
                        }
                    })
                    .await;

                match persisted {
                    Ok(()) => {
                        info!(
                            draft_id = %draft_id,
                            remote_id = %receipt.remote_id,
                            "Draft published"
                        );
                        job.record_publish_success().await;
                    }
                    Err(e) => {
                        warn!(draft_id = %draft_id, error = %e, "Failed to persist publish result");
                        job.record_publish_failure(draft.topic_id, e.to_string()).await;
                    }
                }
            }
            Err(e) => {
                warn!(
                    draft_id = %draft.id,
                    topic_id = %draft.topic_id,
                    error = %e,
                    "Draft publish failed"
                );
                for line in &e.debug {
                    debug!(draft_id = %draft.id, "{line}");
                }
                job.record_publish_failure(draft.topic_id, e.to_string()).await;
            }
        }
    }
}
