//! LLM content generation.
//!
//! The [`ContentGenerator`] trait is the seam the batch core works against;
//! [`AnthropicGenerator`] is the production implementation built on rig-core.

mod anthropic;

pub use anthropic::AnthropicGenerator;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::LlmError;
use crate::store::model::{TopicRole, TopicalMapContext, WebsiteContext};

/// Cluster-awareness hints for a topic that belongs to a topical map.
#[derive(Debug, Clone)]
pub struct ClusterHints {
    pub map: TopicalMapContext,
    /// The topic being generated, so the model can avoid self-links.
    pub topic_id: Uuid,
    pub role: TopicRole,
}

/// One content-generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub title: String,
    pub outline: Vec<String>,
    pub content_prompt: String,
    pub website_context: Option<WebsiteContext>,
    pub cluster: Option<ClusterHints>,
}

/// Generated article plus SEO metadata.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub excerpt: String,
}

/// External content-generation call.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, LlmError>;
}
