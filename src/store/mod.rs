//! Document store — whole-schema read/write over a single JSON document.
//!
//! The store follows a read-then-mutate-then-write pattern: callers load the
//! full schema, patch it in memory, and save it back. Concurrent writers must
//! go through the batch [`MutationSerializer`](crate::batch::MutationSerializer).

mod json_file;
mod memory;
pub mod model;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use model::{
    BlogConfig, DbSchema, DraftPost, DraftStatus, Topic, TopicRef, TopicRole, TopicStatus,
    TopicalMapContext, WebsiteContext,
};

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend-agnostic document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the current schema snapshot.
    async fn load(&self) -> Result<DbSchema, StoreError>;

    /// Replace the stored schema.
    async fn save(&self, schema: &DbSchema) -> Result<(), StoreError>;
}
