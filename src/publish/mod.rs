//! CMS publishing.
//!
//! [`CmsPublisher`] is the seam the batch core works against;
//! [`PayloadPublisher`] is the production implementation for Payload CMS.

mod payload;

pub use payload::PayloadPublisher;

use async_trait::async_trait;

use crate::error::PublishError;
use crate::store::model::{BlogConfig, DraftPost};

/// Identifier assigned by the CMS for a published post.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub remote_id: String,
}

/// External CMS publish call.
#[async_trait]
pub trait CmsPublisher: Send + Sync {
    async fn publish(
        &self,
        draft: &DraftPost,
        config: &BlogConfig,
    ) -> Result<PublishReceipt, PublishError>;
}
