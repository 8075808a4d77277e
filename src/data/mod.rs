//! Render manifest for the external renderer.
//!
//! The corpus is handed over as JSON files in the output directory:
//!
//! | Path                  | Description                                   |
//! |-----------------------|-----------------------------------------------|
//! | `<output>/posts.json` | Site info and renderable posts, listing order |
//! | `<output>/drafts.json`| Drafts sorted by identifier (opt-in)          |
//!
//! ```text
//! Corpus ──► render_plan(layouts) ──► Manifest ──► posts.json
//!    │
//!    └────► drafts_sorted() ───────► DraftManifest ──► drafts.json
//! ```

mod types;

pub use types::{DraftManifest, Manifest, ManifestPaths, PageData, SiteData};

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use folio_core::{Corpus, LayoutRegistry, Neighbors, RenderPlan};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const POSTS_FILE: &str = "posts.json";
pub const DRAFTS_FILE: &str = "drafts.json";

/// Build the `posts.json` contents from a render plan.
pub fn manifest(config: &SiteConfig, plan: &RenderPlan<'_, PathBuf>) -> Manifest {
    let root = config.get_root();
    let posts = plan
        .pages
        .iter()
        .map(|page| {
            let neighbors = Neighbors {
                newer: page.newer,
                older: page.older,
            };
            PageData::new(page.document, Some(page.layout.as_path()), neighbors, root)
        })
        .collect();

    Manifest {
        site: SiteData {
            title: config.base.title.clone(),
            description: config.base.description.clone(),
            author: config.base.author.clone(),
            url: config.base.url.clone(),
        },
        posts,
    }
}

/// Build the `drafts.json` contents. Drafts with an unknown layout are kept
/// without a template.
pub fn draft_manifest(
    config: &SiteConfig,
    corpus: &Corpus,
    layouts: &LayoutRegistry<PathBuf>,
) -> DraftManifest {
    let root = config.get_root();
    let drafts = corpus
        .drafts_sorted()
        .into_iter()
        .map(|doc| {
            let template = layouts.resolve(doc.layout()).ok().map(PathBuf::as_path);
            PageData::new(doc, template, Neighbors::default(), root)
        })
        .collect();

    DraftManifest { drafts }
}

/// Write the manifest files into `[build.output]`.
///
/// Without a draft manifest, a `drafts.json` left by an earlier run is
/// removed.
pub fn write_manifest(
    config: &SiteConfig,
    manifest: &Manifest,
    drafts: Option<&DraftManifest>,
) -> Result<ManifestPaths> {
    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory `{}`", output.display()))?;

    let posts = output.join(POSTS_FILE);
    write_json(&posts, manifest)?;

    let drafts_path = output.join(DRAFTS_FILE);
    let drafts = match drafts {
        Some(drafts_manifest) => {
            write_json(&drafts_path, drafts_manifest)?;
            Some(drafts_path)
        }
        None => {
            // drafts.json from an earlier `build --drafts`
            if drafts_path.exists() {
                fs::remove_file(&drafts_path).with_context(|| {
                    format!("failed to remove stale `{}`", drafts_path.display())
                })?;
            }
            None
        }
    };

    Ok(ManifestPaths { posts, drafts })
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write `{}`", path.display()))
}
