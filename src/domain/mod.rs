//! Domain types for cnblogs-publish.
//!
//! This module contains the core data structures:
//! - Note: A parsed document (metadata + body)
//! - Metadata: Normalized front matter fields
//! - Post: Payloads sent to and received from the blog API

pub mod note;
pub mod post;

// Re-export commonly used types
pub use note::{Metadata, Note, PostIdField};
pub use post::{PostPayload, PublishedPost, RemotePost};
