//! Single-JSON-file store backend.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::model::DbSchema;
use super::DocumentStore;
use crate::error::StoreError;

/// Document store persisted as one pretty-printed JSON file.
///
/// A missing file reads as the empty schema; the parent directory is created
/// on first save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<DbSchema, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, starting empty");
                return Ok(DbSchema::default());
            }
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn save(&self, schema: &DbSchema) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let raw = serde_json::to_string_pretty(schema)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
    }
}
