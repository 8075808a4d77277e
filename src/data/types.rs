//! Data types for the render manifest.
//!
//! These types are serialized to JSON and read by the external renderer.

use folio_core::{Document, LifecycleState, Metadata, Neighbors};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Site-level information, from `[base]`.
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One document, as exposed in `posts.json` and `drafts.json`.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// Canonical identifier (e.g., "2018-02-09-on-ink")
    pub id: String,

    /// Publication date as ISO 8601 string (e.g., "2018-02-09")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    pub slug: String,

    /// Declared title, or one derived from the slug
    pub title: String,

    pub state: LifecycleState,

    /// Effective layout name
    pub layout: String,

    /// Template path of the layout, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Identifier of the next more recent published document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newer: Option<String>,

    /// Identifier of the next older published document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub older: Option<String>,

    /// All front matter fields, verbatim
    pub metadata: Metadata,

    pub body: String,

    /// Storage path of the source file
    pub source: String,
}

impl PageData {
    pub fn new(
        document: &Document,
        template: Option<&Path>,
        neighbors: Neighbors<'_>,
        root: &Path,
    ) -> Self {
        let id = document.id();
        Self {
            id: id.to_string(),
            date: id.date().map(|date| date.to_string()),
            slug: id.slug().to_string(),
            title: document.title().into_owned(),
            state: document.state(),
            layout: document.layout().to_owned(),
            template: template.map(|path| crate::source::storage_path(path, root)),
            newer: neighbors.newer.map(|doc| doc.id().to_string()),
            older: neighbors.older.map(|doc| doc.id().to_string()),
            metadata: document.metadata().clone(),
            body: document.body().to_owned(),
            source: document.source().to_owned(),
        }
    }
}

/// Contents of `posts.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub site: SiteData,
    /// Published documents in listing order
    pub posts: Vec<PageData>,
}

/// Contents of `drafts.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DraftManifest {
    pub drafts: Vec<PageData>,
}

/// Output file paths of one build.
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    pub posts: PathBuf,
    pub drafts: Option<PathBuf>,
}
