//! Front matter extraction and normalization.
//!
//! A note may start with a YAML block between two `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! tags: [a, b]
//! draft: false
//! post_id: 42
//! ---
//!
//! Body text...
//! ```
//!
//! Extraction never fails: a missing, unterminated or unparsable block
//! yields empty metadata and the whole text as body.

use std::fmt::{self, Display};

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::note::RECOGNIZED_KEYS;
use crate::domain::{Metadata, Note};

/// Marker line that opens and closes the block
pub const DELIMITER: &str = "---";

/// String forms of `draft` that mean true (compared case-insensitively)
const TRUTHY_DRAFT: [&str; 4] = ["true", "1", "yes", "on"];

/// Why a block could not be turned into metadata
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("expected a mapping of fields, found {0}")]
    NotAMapping(&'static str),
}

/// The lines of a front matter block, kept verbatim for structured edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterBlock {
    /// Lines between the delimiters, without line endings
    lines: Vec<String>,

    /// Closing delimiter line as written (may carry surrounding spaces)
    closing: String,

    /// Line ending used by the opening delimiter
    newline: &'static str,
}

/// Result of looking for a block at the start of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockScan<'a> {
    /// The first line is not a delimiter
    Absent,

    /// Opened but never closed
    Unterminated,

    /// A complete block; `rest` is everything after the closing line
    Present { block: FrontMatterBlock, rest: &'a str },
}

impl FrontMatterBlock {
    /// Block content as a YAML document
    pub fn yaml(&self) -> String {
        self.lines.join("\n")
    }

    /// True if a line declares `name` (`name:` at line start, indentation ignored)
    pub fn has_field(&self, name: &str) -> bool {
        self.lines.iter().any(|line| {
            line.trim_start()
                .strip_prefix(name)
                .is_some_and(|rest| rest.trim_start().starts_with(':'))
        })
    }

    /// Append `name: value` as the last line before the closing delimiter
    pub fn push_field(&mut self, name: &str, value: impl Display) {
        self.lines.push(format!("{}: {}", name, value));
    }

    /// Render the block, delimiters included, ending with a line break
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push_str(self.newline);
        for line in &self.lines {
            out.push_str(line);
            out.push_str(self.newline);
        }
        out.push_str(&self.closing);
        out.push_str(self.newline);
        out
    }
}

fn strip_line_ending(segment: &str) -> &str {
    let line = segment.strip_suffix('\n').unwrap_or(segment);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Locate the front matter block at the start of `text`.
///
/// The opening line must be exactly `---`; the block closes at the next
/// line whose trimmed content is `---`.
pub fn scan(text: &str) -> BlockScan<'_> {
    let mut segments = text.split_inclusive('\n');
    let Some(first) = segments.next() else {
        return BlockScan::Absent;
    };
    if strip_line_ending(first) != DELIMITER {
        return BlockScan::Absent;
    }

    let newline = if first.ends_with("\r\n") { "\r\n" } else { "\n" };
    let mut offset = first.len();
    let mut lines = Vec::new();

    for segment in segments {
        offset += segment.len();
        let line = strip_line_ending(segment);
        if line.trim() == DELIMITER {
            return BlockScan::Present {
                block: FrontMatterBlock {
                    lines,
                    closing: line.to_string(),
                    newline,
                },
                rest: &text[offset..],
            };
        }
        lines.push(line.to_string());
    }

    BlockScan::Unterminated
}

/// Split a note into normalized metadata and body
pub fn extract(text: &str) -> Note {
    let whole = || Note {
        metadata: Metadata::default(),
        body: text.to_string(),
    };

    if text.lines().count() < 3 {
        return whole();
    }

    match scan(text) {
        BlockScan::Present { block, rest } => match parse_metadata(&block.yaml()) {
            Ok(metadata) => Note {
                metadata,
                body: skip_blank_lines(rest).to_string(),
            },
            Err(e) => {
                warn!("Ignoring malformed front matter ({}); publishing the whole file as body", e);
                whole()
            }
        },
        BlockScan::Unterminated => {
            debug!("Front matter is never closed; treating the whole file as body");
            whole()
        }
        BlockScan::Absent => whole(),
    }
}

/// Parse block content and normalize the recognized fields
pub fn parse_metadata(yaml: &str) -> Result<Metadata, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::default());
    }

    let LastKeyWins(document) = serde_yaml::from_str(yaml)?;
    let mapping = match document {
        Value::Null => Mapping::new(),
        Value::Mapping(mapping) => mapping,
        other => return Err(FrontMatterError::NotAMapping(kind_of(&other))),
    };

    let mut metadata = Metadata {
        title: normalize_title(mapping.get("title")),
        tags: normalize_tags(mapping.get("tags")),
        draft: normalize_draft(mapping.get("draft")),
        post_id: mapping.get("post_id").cloned(),
        extra: Mapping::new(),
    };

    for (key, value) in mapping {
        let recognized = key.as_str().is_some_and(|k| RECOGNIZED_KEYS.contains(&k));
        if !recognized {
            metadata.extra.insert(key, value);
        }
    }

    Ok(metadata)
}

/// A YAML value where a repeated mapping key keeps its last value.
///
/// `serde_yaml::Value` rejects duplicate keys outright; hand-edited notes
/// often repeat one, and losing every field over it is worse.
struct LastKeyWins(Value);

impl<'de> Deserialize<'de> for LastKeyWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LastKeyWinsVisitor).map(LastKeyWins)
    }
}

struct LastKeyWinsVisitor;

impl<'de> de::Visitor<'de> for LastKeyWinsVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Number(n.into()))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        Ok(Value::Number(n.into()))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Number(n.into()))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        LastKeyWins::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(LastKeyWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((LastKeyWins(key), LastKeyWins(value))) = map.next_entry()? {
            // Overwrites in place: the key keeps its first position
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        if tag.trim_start_matches('!').is_empty() {
            return Err(de::Error::custom("empty YAML tag"));
        }
        let LastKeyWins(value) = variant.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Coerce a `draft` value to a boolean.
///
/// Strings are true only for `true`/`1`/`yes`/`on` in any case; other
/// values follow general truthiness. Missing means false.
pub fn normalize_draft(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::String(s)) => {
            let lowered = s.trim().to_lowercase();
            TRUTHY_DRAFT.contains(&lowered.as_str())
        }
        Some(Value::Tagged(tagged)) => normalize_draft(Some(&tagged.value)),
        Some(other) => is_truthy(other),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(fields) => !fields.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Coerce `tags` to trimmed, non-empty strings.
///
/// A single string becomes a one-element list; any other shape is empty.
pub fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(single @ Value::String(_)) => scalar_text(single).into_iter().collect(),
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::Tagged(tagged)) => normalize_tags(Some(&tagged.value)),
        _ => Vec::new(),
    }
}

fn normalize_title(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Tagged(tagged)) => normalize_title(Some(&tagged.value)),
        Some(value) => scalar_text(value),
        None => None,
    }
}

/// Trimmed text of a scalar, or `None` for empty text, null and collections
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Tagged(tagged) => return scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Drop blank lines at the start of the body, keeping the rest verbatim
fn skip_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some(idx) = rest.find('\n') {
        if !rest[..idx].trim().is_empty() {
            return rest;
        }
        rest = &rest[idx + 1..];
    }
    if rest.trim().is_empty() {
        ""
    } else {
        rest
    }
}
