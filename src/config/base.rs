//! `[base]` section configuration.
//!
//! Site-level information copied into the render manifest.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in folio.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Slow Reading"
/// description = "Essays, mostly long"
/// author = "Alice"
/// url = "https://essays.example.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title.
    #[serde(default)]
    pub title: String,

    /// Site description.
    #[serde(default)]
    pub description: String,

    /// Site author, exposed as `site.author` in the manifest.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Base URL of the rendered site.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,
}
