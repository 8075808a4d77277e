//! Layout registry construction.
//!
//! Layouts are template files in `[build.layouts]`, registered under their
//! file stem (`_layouts/post.html` → `post`). Entries of the `[layouts]`
//! table override discovered ones. The handle is the template path; the
//! renderer decides what to do with it.

use crate::{config::SiteConfig, log};
use folio_core::LayoutRegistry;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Build the layout registry for one run.
pub fn load_layouts(config: &SiteConfig) -> LayoutRegistry<PathBuf> {
    let mut registry = LayoutRegistry::new();

    if config.build.layouts.is_dir() {
        let templates = WalkDir::new(&config.build.layouts)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file());

        for entry in templates {
            let Some(name) = entry.path().file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let name = name.to_owned();
            if let Some(previous) = registry.register(name.clone(), entry.into_path()) {
                log!("warn"; "layout `{name}` defined twice, ignoring `{}`", previous.display());
            }
        }
    }

    for (name, template) in &config.layouts {
        registry.register(name.clone(), template.clone());
    }

    registry
}
