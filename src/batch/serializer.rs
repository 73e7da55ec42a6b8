//! Mutation serializer — one read-modify-write at a time against the store.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::model::DbSchema;
use crate::store::DocumentStore;

/// Serializes read-modify-write mutations against the shared document store.
///
/// Every store write during job processing must go through [`run_exclusive`]:
/// each mutation loads the current schema, patches it in memory, and saves it
/// back while holding the queue lock, so no two writers ever interleave.
/// Waiters acquire in FIFO order (tokio mutexes are fair), and a failing
/// mutation releases the queue for the next one.
///
/// [`run_exclusive`]: MutationSerializer::run_exclusive
pub struct MutationSerializer {
    store: Arc<dyn DocumentStore>,
    lock: Mutex<()>,
}

impl MutationSerializer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Apply one mutation to the store, exclusively.
    pub async fn run_exclusive<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut DbSchema) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut schema = self.store.load().await?;
        mutate(&mut schema);
        self.store.save(&schema).await
    }
}
