//! `[build]` section configuration.
//!
//! Collection directories, the layouts directory, and ingestion switches.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in folio.toml - ingestion configuration.
///
/// # Example
/// ```toml
/// [build]
/// posts = "_posts"         # Published collection
/// drafts = "_drafts"       # Draft collection
/// layouts = "_layouts"     # Layout templates, registered by file stem
/// output = "_site"         # Where posts.json is written
/// extensions = ["md", "markdown"]
/// show_drafts = true       # Also write drafts.json
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Published collection directory.
    #[serde(default = "defaults::build::posts")]
    #[educe(Default = defaults::build::posts())]
    pub posts: PathBuf,

    /// Draft collection directory. May be absent on disk.
    #[serde(default = "defaults::build::drafts")]
    #[educe(Default = defaults::build::drafts())]
    pub drafts: PathBuf,

    /// Layout template directory. May be absent on disk.
    #[serde(default = "defaults::build::layouts")]
    #[educe(Default = defaults::build::layouts())]
    pub layouts: PathBuf,

    /// Manifest output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// File extensions treated as documents (without the dot).
    #[serde(default = "defaults::build::extensions")]
    #[educe(Default = defaults::build::extensions())]
    pub extensions: Vec<String>,

    /// Write `drafts.json` next to `posts.json`.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub show_drafts: bool,

    /// Parse documents on the rayon thread pool.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub parallel: bool,
}

impl BuildConfig {
    /// Whether `extension` (without the dot) marks a document file.
    pub fn is_document_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}
