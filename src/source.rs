//! Directory traversal for the published and draft collections.
//!
//! Turns files on disk into [`SourceDocument`]s. Storage paths are reported
//! relative to the project root with `/` separators, so identities and
//! diagnostics do not depend on where the site is checked out.

use crate::{config::SiteConfig, log};
use folio_core::{Collection, SourceDocument};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Documents read from both collections.
#[derive(Debug, Default)]
pub struct Sources {
    pub documents: Vec<SourceDocument>,
    /// Files that could not be read as UTF-8 text.
    pub unreadable: Vec<PathBuf>,
}

impl Sources {
    pub fn count(&self, collection: Collection) -> usize {
        self.documents
            .iter()
            .filter(|doc| doc.collection == collection)
            .count()
    }
}

/// Read every document of the published and draft collections.
///
/// The draft directory is optional. Files are visited in sorted order so
/// repeated runs see identical input.
pub fn collect_sources(config: &SiteConfig) -> Sources {
    let mut sources = Sources::default();
    read_collection(&config.build.posts, Collection::Published, config, &mut sources);
    if config.build.drafts.is_dir() {
        read_collection(&config.build.drafts, Collection::Drafts, config, &mut sources);
    }
    sources
}

fn read_collection(dir: &Path, collection: Collection, config: &SiteConfig, sources: &mut Sources) {
    let files = collect_documents(dir, config);
    let root = config.get_root();

    let results: Vec<_> = files
        .into_par_iter()
        .map(|path| match fs::read_to_string(&path) {
            Ok(text) => Ok(SourceDocument::new(storage_path(&path, root), text, collection)),
            Err(err) => {
                log!("error"; "failed to read `{}`: {err}", path.display());
                Err(path)
            }
        })
        .collect();

    for result in results {
        match result {
            Ok(doc) => sources.documents.push(doc),
            Err(path) => sources.unreadable.push(path),
        }
    }
}

/// Collect document files under `dir` recursively, sorted by path.
///
/// Hidden files and directories are skipped, as are files whose extension
/// is not listed in `[build.extensions]`.
pub fn collect_documents(dir: &Path, config: &SiteConfig) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| config.build.is_document_extension(ext))
        })
        .map(DirEntry::into_path)
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Path relative to `root` with forward slashes; absolute if outside root.
pub fn storage_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
