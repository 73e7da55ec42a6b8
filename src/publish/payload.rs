//! Payload CMS publisher.
//!
//! Converts a draft into a Payload document (markdown body as a Lexical
//! editor-state tree, plus mapped/default fields from the blog config) and
//! POSTs it to the configured collection. Failures carry the request debug
//! trace so the caller can surface what was actually sent.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::{CmsPublisher, PublishReceipt};
use crate::error::PublishError;
use crate::store::model::{BlogConfig, DraftPost};

/// Publisher for a Payload CMS REST endpoint.
pub struct PayloadPublisher {
    http: reqwest::Client,
}

impl PayloadPublisher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for PayloadPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CmsPublisher for PayloadPublisher {
    async fn publish(
        &self,
        draft: &DraftPost,
        config: &BlogConfig,
    ) -> Result<PublishReceipt, PublishError> {
        let mut debug = Vec::new();

        let body = build_body(draft, config);
        let url = format!("{}/api/{}", config.payload_url, config.collection_slug);

        info!(url = %url, title = %draft.title, "Publishing draft to Payload");
        debug.push(format!("[payload] POST {url}"));
        debug.push(format!("[payload] body: {}", preview_body(&body)));

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("users API-Key {}", config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PublishError::with_debug(
                    format!("Payload CMS request failed: {e}\nURL: POST {url}"),
                    std::mem::take(&mut debug),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug.push(format!("[payload] Error {}: {}", status.as_u16(), text));
            let detail = error_detail(status.as_u16(), &text);
            warn!(status = status.as_u16(), detail = %detail, "Payload publish failed");
            return Err(PublishError::with_debug(
                format!(
                    "Payload CMS error {}: {}\nURL: POST {url}",
                    status.as_u16(),
                    detail
                ),
                debug,
            ));
        }

        let data: Value = response.json().await.map_err(|e| {
            PublishError::with_debug(
                format!("Payload CMS returned unreadable response: {e}"),
                std::mem::take(&mut debug),
            )
        })?;
        let remote_id = extract_remote_id(&data).ok_or_else(|| {
            PublishError::with_debug(
                "Payload CMS response contained no document id".to_string(),
                std::mem::take(&mut debug),
            )
        })?;

        Ok(PublishReceipt { remote_id })
    }
}

/// Build the Payload document body from the draft and config.
fn build_body(draft: &DraftPost, config: &BlogConfig) -> Map<String, Value> {
    let mut body = Map::new();

    // App-managed fields (not configurable)
    body.insert("title".to_string(), json!(draft.title));
    body.insert("slug".to_string(), json!(draft.slug));
    body.insert("content".to_string(), text_to_lexical(&draft.content));
    body.insert("excerpt".to_string(), json!(draft.excerpt));
    if let Some(author) = config.default_values.get("author") {
        body.insert("author".to_string(), coerce_number(author));
    }
    body.insert("publishDate".to_string(), json!(Utc::now().to_rfc3339()));

    // Extra mapped fields from config (for fields the app doesn't manage)
    for (local_key, payload_key) in &config.field_mapping {
        let value = match local_key.as_str() {
            "metaTitle" => json!(draft.meta_title),
            "metaDescription" => json!(draft.meta_description),
            _ => config
                .default_values
                .get(local_key)
                .cloned()
                .unwrap_or(Value::Null),
        };
        body.insert(payload_key.clone(), value);
    }

    // Merge any remaining default values not already set
    for (key, value) in &config.default_values {
        if key == "author" {
            continue;
        }
        body.entry(key.clone()).or_insert_with(|| value.clone());
    }

    body
}

/// Convert markdown text into a minimal Lexical editor-state tree, one
/// paragraph node per blank-line-separated block.
fn text_to_lexical(text: &str) -> Value {
    let paragraphs: Vec<Value> = text
        .split("\n\n")
        .filter(|p| !p.is_empty())
        .map(|paragraph| {
            json!({
                "type": "paragraph",
                "children": [{
                    "type": "text",
                    "text": paragraph,
                    "format": 0,
                    "detail": 0,
                    "mode": "normal",
                    "style": "",
                    "version": 1,
                }],
                "direction": "ltr",
                "format": "",
                "indent": 0,
                "textFormat": 0,
                "textStyle": "",
                "version": 1,
            })
        })
        .collect();

    json!({
        "root": {
            "type": "root",
            "children": paragraphs,
            "direction": "ltr",
            "format": "",
            "indent": 0,
            "version": 1,
        }
    })
}

/// Payload expects relationship fields as numeric ids.
fn coerce_number(value: &Value) -> Value {
    match value {
        Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// Decode a non-2xx response body into a readable detail string.
///
/// Payload error bodies carry an `errors` array, optionally with per-field
/// sub-errors; when nothing usable is present, fall back to a status hint.
fn error_detail(status: u16, body: &str) -> String {
    let mut detail = body.to_string();

    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        let mut messages = Vec::new();
        if let Some(errors) = parsed.get("errors").and_then(Value::as_array) {
            for err in errors {
                let message = err
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                messages.push(message);

                if let Some(field_errors) =
                    err.pointer("/data/errors").and_then(Value::as_array)
                {
                    for field_err in field_errors {
                        let path = field_err
                            .get("path")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown");
                        let message =
                            field_err.get("message").and_then(Value::as_str).unwrap_or("");
                        messages.push(format!("  {path}: {message}"));
                    }
                }
            }
        }
        if !messages.is_empty() {
            detail = messages.join("\n");
        }
    }

    if detail.trim().is_empty() {
        detail = match status {
            400 => "Bad Request - check your payload fields".to_string(),
            401 => "Unauthorized - check your API key".to_string(),
            403 => "Forbidden - your API key may lack permissions".to_string(),
            404 => "Not Found - check collection slug and API URL".to_string(),
            405 => "Method Not Allowed - check collection slug and API URL".to_string(),
            500 => "Internal Server Error on the Payload instance".to_string(),
            _ => format!("HTTP {status}"),
        };
    }

    detail
}

/// Create responses wrap the document under `doc`; fall back to a top-level id.
fn extract_remote_id(data: &Value) -> Option<String> {
    let id = data.pointer("/doc/id").or_else(|| data.get("id"))?;
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Body summary for the debug trace: full fields but truncated content.
fn preview_body(body: &Map<String, Value>) -> String {
    let mut preview = body.clone();
    if let Some(content) = preview.get_mut("content") {
        let rendered: String = content.to_string().chars().take(20).collect();
        *content = json!(format!("{rendered}..."));
    }
    serde_json::to_string_pretty(&preview).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::*;
    use crate::store::model::DraftStatus;

    fn make_draft() -> DraftPost {
        DraftPost {
            id: Uuid::new_v4(),
            topic_id: Uuid::new_v4(),
            title: "Test Post".to_string(),
            slug: "test-post".to_string(),
            content: "First paragraph.\n\nSecond paragraph.".to_string(),
            meta_title: Some("Test Post SEO".to_string()),
            meta_description: Some("A test post".to_string()),
            excerpt: Some("A teaser.".to_string()),
            status: DraftStatus::Draft,
            published_to: None,
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_config() -> BlogConfig {
        BlogConfig {
            id: Uuid::new_v4(),
            name: "Main blog".to_string(),
            payload_url: "https://cms.example.com".to_string(),
            api_key: "key".to_string(),
            collection_slug: "posts".to_string(),
            blog_url: Some("https://example.com/".to_string()),
            field_mapping: HashMap::from([(
                "metaTitle".to_string(),
                "seoTitle".to_string(),
            )]),
            default_values: HashMap::from([
                ("author".to_string(), json!("7")),
                ("category".to_string(), json!("baking")),
            ]),
            website_context: None,
        }
    }

    #[test]
    fn lexical_tree_has_one_node_per_paragraph() {
        let tree = text_to_lexical("one\n\ntwo\n\n");
        let children = tree.pointer("/root/children").unwrap().as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[0].pointer("/children/0/text").unwrap(),
            &json!("one")
        );
    }

    #[test]
    fn body_applies_mapping_and_defaults() {
        let body = build_body(&make_draft(), &make_config());

        assert_eq!(body["title"], json!("Test Post"));
        assert_eq!(body["seoTitle"], json!("Test Post SEO"));
        assert_eq!(body["author"], json!(7));
        assert_eq!(body["category"], json!("baking"));
        assert!(body.contains_key("publishDate"));
    }

    #[test]
    fn mapped_fields_win_over_defaults() {
        let mut config = make_config();
        config
            .field_mapping
            .insert("category".to_string(), "section".to_string());
        config
            .default_values
            .insert("category".to_string(), json!("bread"));

        let body = build_body(&make_draft(), &config);
        assert_eq!(body["section"], json!("bread"));
    }

    #[test]
    fn error_detail_decodes_payload_errors() {
        let body = r#"{"errors":[{"message":"Validation failed","data":{"errors":[{"path":"slug","message":"required"}]}}]}"#;
        let detail = error_detail(400, body);
        assert!(detail.contains("Validation failed"));
        assert!(detail.contains("slug: required"));
    }

    #[test]
    fn error_detail_falls_back_to_status_hint() {
        assert!(error_detail(401, "").contains("check your API key"));
        assert_eq!(error_detail(418, ""), "HTTP 418");
    }

    #[test]
    fn remote_id_from_doc_or_top_level() {
        assert_eq!(
            extract_remote_id(&json!({"doc": {"id": 12}})),
            Some("12".to_string())
        );
        assert_eq!(
            extract_remote_id(&json!({"id": "abc"})),
            Some("abc".to_string())
        );
        assert_eq!(extract_remote_id(&json!({"message": "ok"})), None);
    }
}
