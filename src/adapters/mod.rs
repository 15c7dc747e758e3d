//! Adapter interfaces for external systems.
//!
//! The publisher only knows the [`BlogApi`] trait; the cnblogs editor API
//! is the one real implementation.

pub mod cnblogs;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PostPayload, PublishedPost, RemotePost};

// Re-export the cnblogs adapter
pub use cnblogs::CnblogsClient;

/// Failure talking to the blog API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status outside the accepted set
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, TLS, or timeout failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Remote post API
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// Human-readable API name
    fn name(&self) -> &str;

    /// Fetch the current representation of an existing post
    async fn fetch_post(&self, post_id: u64) -> Result<RemotePost, ApiError>;

    /// Create or update a post (an `id` in the payload means update)
    async fn save_post(&self, payload: &PostPayload) -> Result<PublishedPost, ApiError>;
}
