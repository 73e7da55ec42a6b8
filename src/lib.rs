//! Blogsmith — batch blog-content generation and publishing.

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod llm;
pub mod publish;
pub mod store;
