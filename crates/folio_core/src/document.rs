//! Front matter parsing.
//!
//! A document may start with a metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! layout: post
//! title: "On Reading Slowly"
//! ---
//! The body starts here.
//! ```
//!
//! The block is a flat `key: value` mapping. Documents that do not start
//! with the marker at offset 0 have no metadata and the whole text is body.

use crate::error::ErrorKind;
use std::collections::{BTreeMap, btree_map::Entry};

/// Line that opens and closes a metadata block.
pub const MARKER: &str = "---";

/// Flat string-to-string metadata of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Declared layout name, ignoring an empty value.
    pub fn layout(&self) -> Option<&str> {
        self.get("layout").filter(|name| !name.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|title| !title.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, value: String, line: usize) -> Result<(), ErrorKind> {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(_) => Err(ErrorKind::DuplicateMetadataKey {
                key: key.to_owned(),
                line,
            }),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Result of splitting a raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument<'a> {
    pub metadata: Metadata,
    /// Everything after the closing marker line.
    pub body: &'a str,
    /// Whether the text opened with a metadata block at all.
    pub has_front_matter: bool,
}

/// Split `text` into its metadata block and body.
///
/// # Errors
///
/// - [`ErrorKind::UnterminatedMetadataBlock`] when the opening marker has
///   no closing marker anywhere after it.
/// - [`ErrorKind::DuplicateMetadataKey`] when a key repeats in the block.
/// - [`ErrorKind::MalformedMetadata`] for lines that are not flat
///   `key: value` pairs.
pub fn parse_document(text: &str) -> Result<ParsedDocument<'_>, ErrorKind> {
    let mut lines = text.split_inclusive('\n');

    let opened = lines.next().is_some_and(is_marker);
    if !opened {
        return Ok(ParsedDocument {
            metadata: Metadata::default(),
            body: text,
            has_front_matter: false,
        });
    }

    // Locate the closing marker first so a missing one is always reported
    // as unterminated, whatever the following text looks like.
    let mut offset = text.split_inclusive('\n').next().map_or(0, str::len);
    let mut block = Vec::new();
    let mut body_start = None;
    for line in lines {
        offset += line.len();
        if is_marker(line) {
            body_start = Some(offset);
            break;
        }
        block.push(line);
    }
    let body_start = body_start.ok_or(ErrorKind::UnterminatedMetadataBlock)?;

    let mut metadata = Metadata::default();
    for (index, line) in block.into_iter().enumerate() {
        // Line 1 is the opening marker.
        parse_line(line, index + 2, &mut metadata)?;
    }

    Ok(ParsedDocument {
        metadata,
        body: &text[body_start..],
        has_front_matter: true,
    })
}

#[inline]
fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}

fn parse_line(line: &str, line_no: usize, metadata: &mut Metadata) -> Result<(), ErrorKind> {
    let content = line.trim_end_matches(['\n', '\r']);
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(());
    }

    let malformed = |reason| ErrorKind::MalformedMetadata {
        line: line_no,
        reason,
    };

    if content.starts_with([' ', '\t']) {
        return Err(malformed("nested values are not supported"));
    }
    let (key, value) = content
        .split_once(':')
        .ok_or_else(|| malformed("expected `key: value`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(malformed("empty key"));
    }

    metadata.insert(key, unquote(value.trim()).to_owned(), line_no)
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
