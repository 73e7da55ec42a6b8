//! Batch content-generation job system.
//!
//! A submitted job fans its topic ids out across a bounded worker pool,
//! tracks per-item success/failure independently, supports cooperative
//! cancellation, and can chain into an auto-publish pass that pushes the
//! freshly generated drafts to the configured CMS.

mod context;
mod job;
mod publisher;
mod registry;
mod serializer;
mod worker;

pub use context::build_topical_map_context;
pub use job::{BatchJob, JobFailure, JobHandle, JobStatus};
pub use registry::{BatchDeps, JobRegistry};
pub use serializer::MutationSerializer;
