//! Topical-map context builder.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::model::{Topic, TopicRef, TopicRole, TopicalMapContext};
use crate::store::DocumentStore;

/// Build the cluster context for a job's topic set.
///
/// Runs once before any worker starts; the result is shared read-only by all
/// workers. Returns `None` when no topic in the set has the pillar role — the
/// job's topics are not part of a cluster and generation proceeds without
/// cross-linking hints.
pub async fn build_topical_map_context(
    store: &Arc<dyn DocumentStore>,
    topic_ids: &[Uuid],
    blog_config_id: Option<Uuid>,
) -> Result<Option<TopicalMapContext>, StoreError> {
    let schema = store.load().await?;
    let topics: Vec<&Topic> = topic_ids
        .iter()
        .filter_map(|id| schema.topic(*id))
        .collect();

    // At most one pillar expected per job
    let Some(pillar) = topics
        .iter()
        .find(|t| t.role == Some(TopicRole::Pillar))
    else {
        return Ok(None);
    };

    let clusters: Vec<TopicRef> = topics
        .iter()
        .filter(|t| t.role == Some(TopicRole::Cluster))
        .map(|t| to_ref(t))
        .collect();

    let base_url = blog_config_id
        .and_then(|id| schema.blog_config(id))
        .and_then(|config| config.blog_url.as_deref())
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_default();

    debug!(
        pillar = %pillar.title,
        clusters = clusters.len(),
        base_url = %base_url,
        "Built topical-map context"
    );

    Ok(Some(TopicalMapContext {
        pillar: to_ref(pillar),
        clusters,
        base_url,
    }))
}

fn to_ref(topic: &Topic) -> TopicRef {
    TopicRef {
        id: topic.id,
        title: topic.title.clone(),
        slug: topic.slug.clone(),
    }
}
