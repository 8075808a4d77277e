//! Ingestion orchestration for the CLI commands.
//!
//! # Architecture
//!
//! ```text
//! ingest_site()
//!     │
//!     ├── collect_sources() ──► SourceDocument[] (posts + drafts)
//!     ├── folio_core::ingest[_parallel]() ──► Corpus + rejected
//!     └── load_layouts() ──► LayoutRegistry<PathBuf>
//!
//! build_site()  ──► render_plan() ──► posts.json / drafts.json
//! check_site()  ──► render_plan() + draft previews ──► CheckReport
//! list_site()   ──► listing lines
//! show_document() ──► preview() ──► PageData JSON
//! ```

use crate::{
    config::SiteConfig,
    data::{self, ManifestPaths, PageData},
    layouts::load_layouts,
    log,
    source::collect_sources,
};
use anyhow::{Context, Result, anyhow};
use folio_core::{
    Collection, Corpus, DocumentId, Ingestion, LayoutRegistry, Neighbors, ingest, ingest_parallel,
};
use std::path::PathBuf;

/// Everything one ingestion run produced.
#[derive(Debug)]
pub struct Run {
    pub ingestion: Ingestion,
    pub layouts: LayoutRegistry<PathBuf>,
    /// Files that could not be read.
    pub unreadable: usize,
}

impl Run {
    pub const fn corpus(&self) -> &Corpus {
        &self.ingestion.corpus
    }
}

/// Read both collections and build the corpus.
///
/// Per-document problems are logged and leave the document out. A duplicate
/// identity within either collection aborts the run.
pub fn ingest_site(config: &SiteConfig) -> Result<Run> {
    let sources = collect_sources(config);
    for collection in [Collection::Published, Collection::Drafts] {
        log!("ingest"; "{} collection: {} documents", collection.name(), sources.count(collection));
    }

    let unreadable = sources.unreadable.len();
    let ingestion = if config.build.parallel {
        ingest_parallel(sources.documents)
    } else {
        ingest(sources.documents)
    }
    .context("ingestion aborted, nothing was written")?;

    for err in &ingestion.rejected {
        log!("error"; "{} {err}", err.stage().name());
    }

    Ok(Run {
        ingestion,
        layouts: load_layouts(config),
        unreadable,
    })
}

/// Ingest and write the render manifest.
pub fn build_site(config: &SiteConfig, show_drafts: bool) -> Result<ManifestPaths> {
    let run = ingest_site(config)?;
    let corpus = run.corpus();

    let plan = corpus.render_plan(&run.layouts);
    for err in &plan.skipped {
        log!("warn"; "{err}, not rendered");
    }

    let manifest = data::manifest(config, &plan);
    let drafts = show_drafts.then(|| data::draft_manifest(config, corpus, &run.layouts));
    let paths = data::write_manifest(config, &manifest, drafts.as_ref())?;

    log!(
        "build";
        "{} of {} posts written to {}",
        manifest.posts.len(),
        corpus.len(),
        paths.posts.display()
    );
    if let (Some(path), Some(drafts)) = (&paths.drafts, &drafts) {
        log!("build"; "{} drafts written to {}", drafts.drafts.len(), path.display());
    }

    Ok(paths)
}

/// Problems found by [`check_site`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub published: usize,
    pub drafts: usize,
    /// Documents excluded during ingestion.
    pub rejected: usize,
    /// Published documents with an unknown layout.
    pub unknown_layouts: usize,
    /// Drafts with an unknown layout; reported, not counted as problems.
    pub draft_warnings: usize,
    pub unreadable: usize,
}

impl CheckReport {
    pub const fn problems(&self) -> usize {
        self.rejected + self.unknown_layouts + self.unreadable
    }
}

/// Ingest and resolve every layout without writing anything.
pub fn check_site(config: &SiteConfig) -> Result<CheckReport> {
    let run = ingest_site(config)?;
    let corpus = run.corpus();

    let plan = corpus.render_plan(&run.layouts);
    for err in &plan.skipped {
        log!("error"; "{} {err}", err.stage().name());
    }

    let mut draft_warnings = 0;
    for draft in corpus.drafts_sorted() {
        if let Some(Err(err)) = corpus.preview(draft.id(), &run.layouts) {
            log!("warn"; "{err}");
            draft_warnings += 1;
        }
    }

    let report = CheckReport {
        published: corpus.len(),
        drafts: corpus.draft_count(),
        rejected: run.ingestion.rejected.len(),
        unknown_layouts: plan.skipped.len(),
        draft_warnings,
        unreadable: run.unreadable,
    };
    log!(
        "check";
        "{} published, {} drafts, {} problems",
        report.published,
        report.drafts,
        report.problems()
    );
    Ok(report)
}

/// Listing lines in index order: `<id>  <layout>  <title>`.
pub fn list_site(config: &SiteConfig, drafts: bool) -> Result<Vec<String>> {
    let run = ingest_site(config)?;
    Ok(listing(run.corpus(), drafts))
}

fn listing(corpus: &Corpus, drafts: bool) -> Vec<String> {
    let documents: Vec<_> = if drafts {
        corpus.drafts_sorted()
    } else {
        corpus.published().iter().collect()
    };

    documents
        .into_iter()
        .map(|doc| format!("{:<40}  {:<10}  {}", doc.id(), doc.layout(), doc.title()))
        .collect()
}

/// Pretty JSON for one document, published or draft.
pub fn show_document(config: &SiteConfig, id: &str) -> Result<String> {
    let id: DocumentId = id
        .parse()
        .map_err(|err| anyhow!("`{id}` is not a document identifier: {err}"))?;

    let run = ingest_site(config)?;
    let corpus = run.corpus();
    let document = corpus
        .get(&id)
        .ok_or_else(|| anyhow!("no document with identifier `{id}`"))?;

    let (template, neighbors) = match corpus.preview(&id, &run.layouts) {
        Some(Ok(page)) => {
            let neighbors = Neighbors {
                newer: page.newer,
                older: page.older,
            };
            (Some(page.layout.as_path()), neighbors)
        }
        Some(Err(err)) => {
            log!("warn"; "{err}");
            (None, Neighbors::default())
        }
        None => (None, Neighbors::default()),
    };

    let page = PageData::new(document, template, neighbors, config.get_root());
    Ok(serde_json::to_string_pretty(&page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn post(layout: &str, title: &str) -> String {
        format!("---\nlayout: {layout}\ntitle: {title}\n---\n{title} body\n")
    }

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "_layouts/post.html", "{{ content }}");
        write(root, "_layouts/default.html", "{{ content }}");
        write(root, "_posts/2018-02-09-b.md", &post("post", "B"));
        write(root, "_posts/2018-02-09-a.md", &post("post", "A"));
        write(root, "_posts/2019-06-01-newest.md", &post("post", "Newest"));
        write(root, "_posts/2017-01-01-gallery.md", &post("gallery", "Gallery"));
        write(root, "_posts/2017-01-02-broken.md", "---\nlayout: post\n");
        write(root, "_drafts/idea.md", "Loose thoughts.");

        let mut config = SiteConfig::from_str("[base]\ntitle = \"Essays\"").unwrap();
        config.resolve_paths(root);
        (dir, config)
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_build_writes_posts_in_listing_order() {
        let (_dir, config) = site();
        let paths = build_site(&config, false).unwrap();

        let json = read_json(&paths.posts);
        assert_eq!(json["site"]["title"], "Essays");

        let ids: Vec<_> = json["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_owned())
            .collect();
        // gallery has no layout template, broken never parsed
        assert_eq!(ids, ["2019-06-01-newest", "2018-02-09-a", "2018-02-09-b"]);

        let first = &json["posts"][0];
        assert_eq!(first["date"], "2019-06-01");
        assert_eq!(first["slug"], "newest");
        assert_eq!(first["title"], "Newest");
        assert_eq!(first["state"], "published");
        assert_eq!(first["template"], "_layouts/post.html");
        assert_eq!(first["metadata"]["layout"], "post");
        assert_eq!(first["body"], "Newest body\n");
        assert_eq!(first["source"], "_posts/2019-06-01-newest.md");
        assert!(first.get("newer").is_none());
        assert_eq!(first["older"], "2018-02-09-a");

        // gallery is listed after b but never rendered, so b is the last page
        let last = &json["posts"][2];
        assert_eq!(last["newer"], "2018-02-09-a");
        assert!(last.get("older").is_none());

        assert!(paths.drafts.is_none());
        assert!(!config.build.output.join(data::DRAFTS_FILE).exists());
    }

    #[test]
    fn test_build_with_drafts() {
        let (_dir, config) = site();
        let paths = build_site(&config, true).unwrap();

        let json = read_json(paths.drafts.as_ref().unwrap());
        let draft = &json["drafts"][0];
        assert_eq!(draft["id"], "idea");
        assert_eq!(draft["state"], "draft");
        assert_eq!(draft["layout"], "default");
        assert_eq!(draft["template"], "_layouts/default.html");
        assert!(draft.get("date").is_none());
    }

    #[test]
    fn test_build_without_drafts_removes_stale_drafts_file() {
        let (_dir, config) = site();
        let drafts_file = config.build.output.join(data::DRAFTS_FILE);

        build_site(&config, true).unwrap();
        assert!(drafts_file.exists());

        build_site(&config, false).unwrap();
        assert!(!drafts_file.exists());
    }

    #[test]
    fn test_duplicate_draft_identity_aborts_build() {
        let (dir, config) = site();
        write(dir.path(), "_drafts/old/idea.md", "Older thoughts.");

        let err = build_site(&config, true).unwrap_err();
        assert!(format!("{err:#}").contains("_drafts/old/idea.md"));
        assert!(!config.build.output.join(data::POSTS_FILE).exists());
    }

    #[test]
    fn test_duplicate_identity_aborts_build() {
        let (dir, config) = site();
        write(dir.path(), "_posts/archive/2018-02-09-a.markdown", &post("post", "Again"));

        let err = build_site(&config, false).unwrap_err();
        assert!(format!("{err:#}").contains("2018-02-09-a"));
        assert!(!config.build.output.join(data::POSTS_FILE).exists());
    }

    #[test]
    fn test_check_counts_problems() {
        let (_dir, config) = site();
        let report = check_site(&config).unwrap();

        assert_eq!(report.published, 4);
        assert_eq!(report.drafts, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.unknown_layouts, 1);
        assert_eq!(report.draft_warnings, 0);
        assert_eq!(report.problems(), 2);
    }

    #[test]
    fn test_check_clean_site() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "_layouts/post.html", "");
        write(dir.path(), "_posts/2018-02-09-a.md", &post("post", "A"));
        write(dir.path(), "_drafts/idea.md", "no layout, no default template");

        let mut config = SiteConfig::default();
        config.resolve_paths(dir.path());
        let report = check_site(&config).unwrap();

        assert_eq!(report.problems(), 0);
        assert_eq!(report.draft_warnings, 1);
    }

    #[test]
    fn test_sequential_and_parallel_builds_agree() {
        let (_dir, mut config) = site();
        let parallel = list_site(&config, false).unwrap();
        config.build.parallel = false;
        let sequential = list_site(&config, false).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_list_published_and_drafts() {
        let (_dir, config) = site();

        let published = list_site(&config, false).unwrap();
        assert_eq!(published.len(), 4);
        assert!(published[0].starts_with("2019-06-01-newest"));
        assert!(published[3].starts_with("2017-01-01-gallery"));

        let drafts = list_site(&config, true).unwrap();
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].starts_with("idea"));
        assert!(drafts[0].ends_with("Idea"));
    }

    #[test]
    fn test_show_document() {
        let (_dir, config) = site();

        let json: Value = serde_json::from_str(&show_document(&config, "2018-02-09-a").unwrap()).unwrap();
        assert_eq!(json["title"], "A");
        assert_eq!(json["newer"], "2019-06-01-newest");
        assert_eq!(json["older"], "2018-02-09-b");

        let draft: Value = serde_json::from_str(&show_document(&config, "idea").unwrap()).unwrap();
        assert_eq!(draft["state"], "draft");

        assert!(show_document(&config, "2000-01-01-missing").is_err());
        assert!(show_document(&config, "Not An Id").is_err());
    }
}
