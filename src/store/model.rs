//! Domain records persisted in the document store.
//!
//! Serde names are camelCase so the on-disk JSON matches the format the
//! surrounding app reads and writes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a planned topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Draft,
    Approved,
    Generated,
}

/// Role of a topic within a topical map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicRole {
    Pillar,
    Cluster,
}

/// A planned piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub outline: Vec<String>,
    pub content_prompt: String,
    pub status: TopicStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topical_map_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TopicRole>,
}

/// Lifecycle of a generated draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Reviewing,
    Published,
}

/// A generated article plus SEO metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPost {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub status: DraftStatus,
    /// Blog config the draft was published to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_to: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Site context handed to the generator so content matches the target blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteContext {
    pub description: String,
    pub target_audience: String,
    pub tone: String,
    pub additional_instructions: String,
}

/// A CMS publish target plus its field mapping and generation context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogConfig {
    pub id: Uuid,
    pub name: String,
    /// Base URL of the Payload CMS instance.
    pub payload_url: String,
    pub api_key: String,
    pub collection_slug: String,
    /// Public URL of the blog, used as the base for cluster cross-links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_url: Option<String>,
    /// Local field name -> Payload field name.
    #[serde(default)]
    pub field_mapping: HashMap<String, String>,
    #[serde(default)]
    pub default_values: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_context: Option<WebsiteContext>,
}

/// Shorthand reference to a topic, used for cluster cross-linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

/// Cross-referencing metadata for a content cluster, computed once per batch
/// job and shared read-only by its workers. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicalMapContext {
    pub pillar: TopicRef,
    pub clusters: Vec<TopicRef>,
    /// Site base URL without a trailing slash; empty when unknown.
    pub base_url: String,
}

/// Full store schema: every collection, keyed by entity id within.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSchema {
    #[serde(default)]
    pub blog_configs: Vec<BlogConfig>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub drafts: Vec<DraftPost>,
}

impl DbSchema {
    /// Point lookup of a topic by id.
    pub fn topic(&self, id: Uuid) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn topic_mut(&mut self, id: Uuid) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|t| t.id == id)
    }

    /// Point lookup of a blog config by id.
    pub fn blog_config(&self, id: Uuid) -> Option<&BlogConfig> {
        self.blog_configs.iter().find(|c| c.id == id)
    }

    pub fn draft_mut(&mut self, id: Uuid) -> Option<&mut DraftPost> {
        self.drafts.iter_mut().find(|d| d.id == id)
    }
}
