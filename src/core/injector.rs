//! Records a newly issued post id in the note's front matter.
//!
//! Runs once after a successful first publish. The edit goes through the
//! parsed [`FrontMatterBlock`] so every existing line, the closing
//! delimiter, and the body are written back exactly as they were.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::front_matter::{scan, BlockScan};

/// Front matter key holding the post id
pub const POST_ID_FIELD: &str = "post_id";

/// What an injection did to the note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The note had no front matter; a block holding only the id was added
    CreatedBlock,

    /// The id was inserted before the closing delimiter
    Inserted,

    /// The block already declares a post id; nothing written
    AlreadyPresent,

    /// The block is never closed; nothing written
    MalformedBlock,
}

/// Planned edit: the outcome plus new contents when a write is needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub outcome: InjectOutcome,
    pub contents: Option<String>,
}

/// Compute the note contents with `post_id` recorded
pub fn splice_post_id(text: &str, post_id: u64) -> Splice {
    match scan(text) {
        BlockScan::Absent => Splice {
            outcome: InjectOutcome::CreatedBlock,
            contents: Some(format!("---\n{}: {}\n---\n\n{}", POST_ID_FIELD, post_id, text)),
        },
        BlockScan::Unterminated => Splice {
            outcome: InjectOutcome::MalformedBlock,
            contents: None,
        },
        BlockScan::Present { mut block, rest } => {
            if block.has_field(POST_ID_FIELD) {
                return Splice {
                    outcome: InjectOutcome::AlreadyPresent,
                    contents: None,
                };
            }

            block.push_field(POST_ID_FIELD, post_id);
            let mut contents = block.render();
            contents.push_str(rest);
            if !contents.ends_with('\n') {
                contents.push('\n');
            }

            Splice {
                outcome: InjectOutcome::Inserted,
                contents: Some(contents),
            }
        }
    }
}

/// Ensure the note at `path` records `post_id` in its front matter.
///
/// A malformed block is reported and left untouched; only I/O failures
/// are errors.
pub fn inject_post_id(path: &Path, post_id: u64) -> Result<InjectOutcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read note: {}", path.display()))?;

    let splice = splice_post_id(&text, post_id);
    if let Some(contents) = &splice.contents {
        write_atomically(path, contents)?;
    }

    match splice.outcome {
        InjectOutcome::CreatedBlock => {
            info!("Created front matter with post_id: {}", post_id);
        }
        InjectOutcome::Inserted => {
            info!("Injected post_id: {} into {}", post_id, path.display());
        }
        InjectOutcome::AlreadyPresent => {
            info!("post_id already present in {}, nothing to inject", path.display());
        }
        InjectOutcome::MalformedBlock => {
            warn!(
                "Front matter in {} is never closed; skipping post_id injection",
                path.display()
            );
        }
    }

    Ok(splice.outcome)
}

/// Replace `path` with `contents` via a temp file in the same directory
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;

    // Keep the note's permissions
    if let Ok(meta) = std::fs::metadata(path) {
        std::fs::set_permissions(tmp.path(), meta.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace note: {}", path.display()))?;

    Ok(())
}
