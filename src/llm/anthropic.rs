//! Anthropic-backed content generator via rig-core.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::anthropic;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use super::{ContentGenerator, GeneratedContent, GenerationRequest};
use crate::error::LlmError;
use crate::store::model::TopicRole;

/// Max tokens for a full blog post plus metadata.
const MAX_TOKENS: u64 = 8192;

/// Content generator backed by the Anthropic API.
pub struct AnthropicGenerator {
    client: rig::client::Client<anthropic::client::AnthropicExt>,
    model: String,
}

impl AnthropicGenerator {
    /// Create a generator for the given API key and model.
    pub fn new(api_key: &SecretString, model: &str) -> Result<Self, LlmError> {
        if api_key.expose_secret().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let client = anthropic::Client::new(api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed(format!("Failed to create Anthropic client: {e}"))
        })?;

        info!(model = model, "Using Anthropic for content generation");
        Ok(Self {
            client,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl ContentGenerator for AnthropicGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, LlmError> {
        let prompt = build_prompt(request);
        debug!(title = %request.title, "Requesting content generation");

        let agent = self
            .client
            .agent(&self.model)
            .max_tokens(MAX_TOKENS)
            .build();

        let reply = agent
            .prompt(prompt)
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        parse_reply(&reply, &request.title)
    }
}

/// Assemble the generation prompt: the article brief, then optional website
/// and cluster blocks, then the JSON output contract.
fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Write a comprehensive, SEO-optimized blog post in Markdown.\n\n\
         Title: {title}\n\
         Outline sections: {outline}\n\n\
         Additional instructions: {instructions}\n",
        title = request.title,
        outline = request.outline.join(", "),
        instructions = request.content_prompt,
    );

    if let Some(ctx) = &request.website_context {
        prompt.push_str(&format!(
            "\nAbout the website this will be published on:\n\
             - Description: {}\n\
             - Target audience: {}\n\
             - Tone: {}\n\
             - Additional instructions: {}\n",
            ctx.description, ctx.target_audience, ctx.tone, ctx.additional_instructions,
        ));
    }

    if let Some(hints) = &request.cluster {
        let role = match hints.role {
            TopicRole::Pillar => "the pillar post of this cluster",
            TopicRole::Cluster => "a supporting cluster post",
        };
        prompt.push_str(&format!(
            "\nThis post is {role} in a topical cluster.\n\
             Pillar post: \"{pillar_title}\" (slug: {pillar_slug})\n\
             Cluster posts:\n",
            role = role,
            pillar_title = hints.map.pillar.title,
            pillar_slug = hints.map.pillar.slug,
        ));
        for sibling in &hints.map.clusters {
            prompt.push_str(&format!(
                "- \"{}\" (slug: {})\n",
                sibling.title, sibling.slug
            ));
        }
        if hints.map.base_url.is_empty() {
            prompt.push_str(
                "Link naturally to the other posts in the cluster using their slugs as \
                 relative URLs (e.g. /my-post-slug). Do not link a post to itself.\n",
            );
        } else {
            prompt.push_str(&format!(
                "Link naturally to the other posts in the cluster using {base}/<slug> URLs. \
                 Do not link a post to itself.\n",
                base = hints.map.base_url,
            ));
        }
    }

    prompt.push_str(
        "\nWrite the full blog post in Markdown format. Start with the title as an H1, \
         then follow the outline. Make it informative, well-structured, and engaging.\n\n\
         In addition to the blog post content, also generate:\n\
         - metaTitle: an SEO-optimized title (~60 characters, may differ from the blog post H1)\n\
         - metaDescription: an SEO meta description (~155 characters)\n\
         - excerpt: a 2-sentence summary/teaser of the post\n\n\
         Respond with a JSON object containing these keys: \"content\", \"metaTitle\", \
         \"metaDescription\", \"excerpt\". The \"content\" value should be the full Markdown \
         blog post. Respond with JSON only, no other text.",
    );

    prompt
}

/// Parse the model reply. When no JSON object can be found, fall back to
/// treating the whole reply as the article body.
fn parse_reply(reply: &str, title: &str) -> Result<GeneratedContent, LlmError> {
    match extract_json_object(reply) {
        Some(json) => serde_json::from_str(json).map_err(LlmError::Json),
        None => Ok(GeneratedContent {
            content: reply.to_string(),
            meta_title: title.to_string(),
            meta_description: String::new(),
            excerpt: String::new(),
        }),
    }
}

/// Extract a JSON object from model output that might contain markdown fences
/// or surrounding prose.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
