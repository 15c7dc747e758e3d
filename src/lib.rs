//! cnblogs-publish - publish Markdown notes to cnblogs
//!
//! Reads a note, parses its `---` front matter, and creates or updates the
//! matching post through the cnblogs editor API. On first publish the
//! assigned `post_id` is written back into the note so later runs update
//! the same post instead of creating a duplicate.
//!
//! # Modules
//!
//! - `adapters`: The blog API seam and the cnblogs HTTP client
//! - `core`: Front matter extraction, post_id injection, publishing
//! - `domain`: Data structures (Metadata, Note, PostPayload)
//! - `config`: Credentials and API settings
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! export CNBLOGS_COOKIE='...'
//! export CNBLOGS_XSRF_TOKEN='...'
//! cnblogs-publish notes/my-first-post.md
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{ApiError, BlogApi, CnblogsClient};
pub use config::{ConfigError, Credentials, ResolvedConfig};
pub use crate::core::{
    extract, inject_post_id, publish_note, InjectOutcome, NoteReport, PublishAction,
    PublishError, PublishOutcome, PublishRequest, Publisher,
};
pub use domain::{Metadata, Note, PostPayload, PublishedPost, RemotePost};
