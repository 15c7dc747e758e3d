//! One publishing run for one note.
//!
//! read -> extract -> resolve title and post_id -> publish -> inject

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::front_matter::extract;
use super::injector::{inject_post_id, InjectOutcome};
use super::publisher::{PublishAction, PublishOutcome, PublishRequest, Publisher};
use crate::adapters::BlogApi;
use crate::domain::{Note, PostIdField};

/// What a run did
#[derive(Debug, Clone, PartialEq)]
pub struct NoteReport {
    pub title: String,
    pub outcome: PublishOutcome,
    /// Set only after a create
    pub injection: Option<InjectOutcome>,
}

/// Turn a parsed note into a publish request.
///
/// An unusable `post_id` is reported and the note is published as new.
pub fn build_request(path: &Path, note: Note) -> PublishRequest {
    let title = note.title_for(path);
    let post_id = match note.metadata.post_id() {
        PostIdField::Absent => None,
        PostIdField::Existing(id) => Some(id),
        PostIdField::Invalid(raw) => {
            warn!("Invalid post_id: {}, publishing as a new post", raw);
            None
        }
    };

    PublishRequest {
        title,
        body: note.body,
        tags: note.metadata.tags,
        draft: note.metadata.draft,
        post_id,
    }
}

/// Publish the note at `path`, recording the new post id on first publish
pub async fn publish_note<A: BlogApi>(path: &Path, publisher: &Publisher<A>) -> Result<NoteReport> {
    info!("Reading {}", path.display());
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read note: {}", path.display()))?;

    let request = build_request(path, extract(&raw));

    info!("Title: {}", request.title);
    info!("Tags: {:?}", request.tags);
    info!("Draft: {}", if request.draft { "yes" } else { "no" });
    match request.post_id {
        Some(id) => info!("Action: update existing post (ID: {})", id),
        None => info!("Action: publish new post"),
    }

    let outcome = publisher
        .publish(&request)
        .await
        .with_context(|| format!("Failed to publish {}", path.display()))?;

    let injection = match outcome.action {
        PublishAction::Created => Some(inject_post_id(path, outcome.post.id)?),
        PublishAction::Updated => None,
    };

    Ok(NoteReport {
        title: request.title,
        outcome,
        injection,
    })
}
