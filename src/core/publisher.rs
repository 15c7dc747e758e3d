//! Create-or-update publishing.
//!
//! Updates always confirm the existing post first: if the fetch fails the
//! update is abandoned instead of falling through to a create, which would
//! leave a duplicate post behind.

use thiserror::Error;
use tracing::info;

use crate::adapters::{ApiError, BlogApi};
use crate::domain::{PostPayload, PublishedPost};

/// Fatal publishing failures
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not fetch existing post {post_id}; refusing to update: {source}")]
    FetchFailed {
        post_id: u64,
        #[source]
        source: ApiError,
    },

    #[error("publish request failed: {0}")]
    SaveFailed(#[source] ApiError),
}

/// Everything needed to publish one note
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub draft: bool,
    /// Existing post to update; `None` creates a new post
    pub post_id: Option<u64>,
}

/// Whether a post was created or updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Created,
    Updated,
}

impl std::fmt::Display for PublishAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishAction::Created => write!(f, "published"),
            PublishAction::Updated => write!(f, "updated"),
        }
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub action: PublishAction,
    pub post: PublishedPost,
}

/// Sends notes to a [`BlogApi`]
pub struct Publisher<A> {
    api: A,
}

impl<A: BlogApi> Publisher<A> {
    /// Create a publisher over an API client
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Access the underlying API client
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Build the payload for `request`, fetching the existing post when updating
    pub async fn prepare(&self, request: &PublishRequest) -> Result<PostPayload, PublishError> {
        let payload = PostPayload::new(
            request.title.clone(),
            request.body.clone(),
            request.tags.clone(),
            request.draft,
        );

        let Some(post_id) = request.post_id else {
            return Ok(payload);
        };

        let remote = self
            .api
            .fetch_post(post_id)
            .await
            .map_err(|source| PublishError::FetchFailed { post_id, source })?;

        Ok(payload.update_of(&remote, post_id))
    }

    /// Create or update the post described by `request`
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError> {
        let payload = self.prepare(request).await?;
        let action = if payload.is_update() {
            PublishAction::Updated
        } else {
            PublishAction::Created
        };

        let post = self
            .api
            .save_post(&payload)
            .await
            .map_err(PublishError::SaveFailed)?;

        info!("Successfully {} on {}: ID {}", action, self.api.name(), post.id);
        Ok(PublishOutcome { action, post })
    }
}
