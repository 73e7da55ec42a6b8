//! In-memory store backend for tests and ephemeral runs.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::model::DbSchema;
use super::DocumentStore;
use crate::error::StoreError;

/// Store backed by an in-memory schema.
#[derive(Default)]
pub struct MemoryStore {
    schema: Mutex<DbSchema>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an initial schema.
    pub fn with_schema(schema: DbSchema) -> Self {
        Self {
            schema: Mutex::new(schema),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<DbSchema, StoreError> {
        Ok(self.schema.lock().await.clone())
    }

    async fn save(&self, schema: &DbSchema) -> Result<(), StoreError> {
        *self.schema.lock().await = schema.clone();
        Ok(())
    }
}
