//! Notes and their front matter metadata.
//!
//! A note is rebuilt from disk on every run; nothing here is persisted
//! except through the post_id injector.

use std::path::Path;

use serde_yaml::{Mapping, Value};

/// Keys with dedicated fields on [`Metadata`]
pub const RECOGNIZED_KEYS: [&str; 4] = ["title", "tags", "draft", "post_id"];

/// Normalized front matter of a note
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Declared title (empty titles are treated as absent)
    pub title: Option<String>,

    /// Trimmed, non-empty tags in declaration order
    pub tags: Vec<String>,

    /// Draft flag (defaults to false)
    pub draft: bool,

    /// Raw `post_id` value as declared; see [`Metadata::post_id`]
    pub post_id: Option<Value>,

    /// Any other declared fields, in order
    pub extra: Mapping,
}

/// Interpretation of the `post_id` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostIdField {
    /// No id recorded: publish as a new post
    Absent,

    /// A previously published post
    Existing(u64),

    /// Declared but unusable (kept as text for the warning)
    Invalid(String),
}

impl Metadata {
    /// True when the note declared no metadata at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.tags.is_empty()
            && !self.draft
            && self.post_id.is_none()
            && self.extra.is_empty()
    }

    /// Resolve the declared `post_id`.
    ///
    /// Positive integers and numeric strings identify an existing post.
    /// A missing value, null, or `0` means a new post.
    pub fn post_id(&self) -> PostIdField {
        match &self.post_id {
            None | Some(Value::Null) => PostIdField::Absent,
            Some(Value::Number(n)) => match n.as_u64() {
                Some(0) => PostIdField::Absent,
                Some(id) => PostIdField::Existing(id),
                None => PostIdField::Invalid(n.to_string()),
            },
            Some(Value::String(s)) => match s.trim() {
                "" => PostIdField::Absent,
                trimmed => match trimmed.parse::<u64>() {
                    Ok(0) => PostIdField::Absent,
                    Ok(id) => PostIdField::Existing(id),
                    Err(_) => PostIdField::Invalid(s.clone()),
                },
            },
            Some(other) => PostIdField::Invalid(
                serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_else(|_| format!("{:?}", other)),
            ),
        }
    }

    /// Re-serialize the metadata as a `---` delimited block.
    ///
    /// Recognized fields come first, followed by the extra fields in their
    /// original order.
    pub fn to_front_matter(&self) -> Result<String, serde_yaml::Error> {
        let mut mapping = Mapping::new();
        if let Some(title) = &self.title {
            mapping.insert("title".into(), Value::String(title.clone()));
        }
        mapping.insert(
            "tags".into(),
            Value::Sequence(self.tags.iter().cloned().map(Value::String).collect()),
        );
        mapping.insert("draft".into(), Value::Bool(self.draft));
        if let Some(post_id) = &self.post_id {
            mapping.insert("post_id".into(), post_id.clone());
        }
        for (key, value) in &self.extra {
            mapping.insert(key.clone(), value.clone());
        }

        let yaml = serde_yaml::to_string(&Value::Mapping(mapping))?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// A parsed note: metadata plus the untouched body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    pub metadata: Metadata,
    pub body: String,
}

impl Note {
    /// Title to publish under: the declared one, else derived from the file name
    pub fn title_for(&self, path: &Path) -> String {
        match &self.metadata.title {
            Some(title) => title.clone(),
            None => title_from_path(path),
        }
    }

    /// Render the note back to text (front matter followed by the body)
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        Ok(format!("{}\n{}", self.metadata.to_front_matter()?, self.body))
    }
}

/// Derive a title from a file name: `my-first-post.md` -> `My First Post`.
///
/// Dashes become spaces and every alphabetic run is capitalized, with the
/// rest of the run lower-cased.
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut title = String::with_capacity(stem.len());
    let mut in_word = false;
    for c in stem.replace('-', " ").chars() {
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}
