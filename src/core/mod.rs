//! Core publishing logic.
//!
//! This module contains:
//! - front_matter: Metadata extraction and normalization
//! - injector: Writing the post_id back into a note
//! - publisher: Create-or-update against a BlogApi
//! - runner: The per-note flow tying them together

pub mod front_matter;
pub mod injector;
pub mod publisher;
pub mod runner;

// Re-export commonly used types
pub use front_matter::{extract, BlockScan, FrontMatterBlock, FrontMatterError};
pub use injector::{inject_post_id, splice_post_id, InjectOutcome};
pub use publisher::{PublishAction, PublishError, PublishOutcome, PublishRequest, Publisher};
pub use runner::{build_request, publish_note, NoteReport};
