//! Ingestion driver and the corpus index.
//!
//! # Architecture
//!
//! ```text
//! SourceDocument ──► parse_document ──► resolve_identity ──► check_consistency ──► classify
//!                                                                                      │
//!             ┌───────────────── per-document errors ──► Ingestion.rejected            │
//!             │                                                                        ▼
//!             └──────────────────────────────────────────────────────────────► Corpus::build
//!                                                                                      │
//!                                              published (date desc, slug asc) ◄───────┤
//!                                              drafts (unordered, preview only) ◄──────┘
//! ```
//!
//! Every document runs through the chain independently. The corpus is only
//! assembled once all of them are done, so duplicate detection always sees
//! the complete published set.

use crate::{
    document::{Metadata, parse_document},
    error::{DocumentError, ErrorKind},
    identity::{DocumentId, check_consistency, resolve_identity},
    layout::LayoutRegistry,
    lifecycle::{Collection, LifecycleState, classify},
};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::{
    borrow::Cow,
    collections::hash_map::Entry,
};

// ============================================================================
// Documents
// ============================================================================

/// A raw document handed over by directory traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Storage path, e.g. `_posts/2018-02-09-on-ink.md`.
    pub path: String,
    pub text: String,
    pub collection: Collection,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, text: impl Into<String>, collection: Collection) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            collection,
        }
    }
}

/// A parsed, identified and classified document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    id: DocumentId,
    /// Storage path, kept for diagnostics only.
    source: String,
    metadata: Metadata,
    body: String,
    state: LifecycleState,
    layout: String,
}

impl Document {
    pub const fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.id.date()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Effective layout name.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Declared title, or the slug in title case (`on-ink` → `On Ink`).
    pub fn title(&self) -> Cow<'_, str> {
        match self.metadata.title() {
            Some(title) => Cow::Borrowed(title),
            None => Cow::Owned(titleize(self.id.slug().as_str())),
        }
    }
}

fn titleize(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run one document through parse, identity and lifecycle.
///
/// Errors carry the source's storage path.
pub fn process(source: &SourceDocument) -> Result<Document, DocumentError> {
    let at = |kind: ErrorKind| kind.at(&source.path);

    let parsed = parse_document(&source.text).map_err(at)?;
    let id = resolve_identity(&source.path).map_err(at)?;
    check_consistency(&id, &parsed.metadata).map_err(at)?;
    let class = classify(source.collection, &id, &parsed.metadata).map_err(at)?;

    Ok(Document {
        id,
        source: source.path.clone(),
        body: parsed.body.to_owned(),
        metadata: parsed.metadata,
        state: class.state,
        layout: class.layout,
    })
}

// ============================================================================
// Corpus
// ============================================================================

/// Read-only index over one ingestion run.
///
/// Published documents are ordered by date descending, then slug
/// ascending. Drafts are kept apart and never appear in [`Self::published`].
#[derive(Debug, Default)]
pub struct Corpus {
    published: Vec<Document>,
    positions: FxHashMap<DocumentId, usize>,
    drafts: FxHashMap<DocumentId, Document>,
}

/// Result of an ingestion run that was not aborted.
#[derive(Debug, Default)]
pub struct Ingestion {
    pub corpus: Corpus,
    /// Documents excluded from the corpus, with the reason.
    pub rejected: Vec<DocumentError>,
}

/// Published neighbors of a document in listing order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    /// The next more recent document (listed before).
    pub newer: Option<&'a Document>,
    /// The next older document (listed after).
    pub older: Option<&'a Document>,
}

impl Corpus {
    /// Index classified documents.
    ///
    /// # Errors
    ///
    /// Two documents of the same collection sharing an identity abort the
    /// whole build with [`ErrorKind::DuplicateDocumentIdentity`], reported
    /// against the later one in input order. A draft and a published
    /// document may share an identity.
    pub fn build(documents: impl IntoIterator<Item = Document>) -> Result<Self, DocumentError> {
        let mut published: Vec<Document> = Vec::new();
        let mut seen: FxHashMap<DocumentId, usize> = FxHashMap::default();
        let mut drafts: FxHashMap<DocumentId, Document> = FxHashMap::default();

        for doc in documents {
            match doc.state {
                LifecycleState::Published => match seen.entry(doc.id.clone()) {
                    Entry::Occupied(first) => {
                        return Err(duplicate(&published[*first.get()], &doc));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(published.len());
                        published.push(doc);
                    }
                },
                LifecycleState::Draft => match drafts.entry(doc.id.clone()) {
                    Entry::Occupied(first) => return Err(duplicate(first.get(), &doc)),
                    Entry::Vacant(slot) => {
                        slot.insert(doc);
                    }
                },
            }
        }

        published.sort_by(|a, b| {
            b.id.date()
                .cmp(&a.id.date())
                .then_with(|| a.id.slug().cmp(b.id.slug()))
        });
        let positions = published
            .iter()
            .enumerate()
            .map(|(index, doc)| (doc.id.clone(), index))
            .collect();

        Ok(Self {
            published,
            positions,
            drafts,
        })
    }

    /// Published documents in listing order.
    pub fn published(&self) -> &[Document] {
        &self.published
    }

    /// Drafts in no particular order.
    pub fn drafts(&self) -> impl Iterator<Item = &Document> {
        self.drafts.values()
    }

    /// Drafts sorted by identity, for stable preview listings.
    pub fn drafts_sorted(&self) -> Vec<&Document> {
        let mut drafts: Vec<_> = self.drafts().collect();
        drafts.sort_by(|a, b| a.id.cmp(&b.id));
        drafts
    }

    /// Look up any document, published first, then drafts.
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.get_published(id).or_else(|| self.get_draft(id))
    }

    pub fn get_published(&self, id: &DocumentId) -> Option<&Document> {
        self.position(id).map(|index| &self.published[index])
    }

    pub fn get_draft(&self, id: &DocumentId) -> Option<&Document> {
        self.drafts.get(id)
    }

    /// Index of a published document in listing order.
    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Previous/next navigation for a published document.
    pub fn neighbors(&self, id: &DocumentId) -> Neighbors<'_> {
        self.position(id)
            .map(|index| self.neighbors_at(index))
            .unwrap_or_default()
    }

    fn neighbors_at(&self, index: usize) -> Neighbors<'_> {
        Neighbors {
            newer: index.checked_sub(1).and_then(|i| self.published.get(i)),
            older: self.published.get(index + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    /// Pair every published document with its layout handle.
    ///
    /// Documents whose layout is not registered are left out and reported
    /// as [`ErrorKind::UnknownLayout`]; the others are unaffected.
    /// Navigation links only between pages that are part of the plan.
    pub fn render_plan<'a, H>(&'a self, registry: &'a LayoutRegistry<H>) -> RenderPlan<'a, H> {
        let mut resolved = Vec::with_capacity(self.published.len());
        let mut skipped = Vec::new();
        for document in &self.published {
            match registry.resolve(&document.layout) {
                Ok(layout) => resolved.push((document, layout)),
                Err(kind) => skipped.push(kind.at(&document.source)),
            }
        }

        let pages = resolved
            .iter()
            .enumerate()
            .map(|(index, &(document, layout))| RenderPage {
                document,
                layout,
                newer: index.checked_sub(1).map(|i| resolved[i].0),
                older: resolved.get(index + 1).map(|&(doc, _)| doc),
            })
            .collect();

        RenderPlan { pages, skipped }
    }

    /// Nearest published neighbors whose layout is registered.
    fn renderable_neighbors<H>(&self, index: usize, registry: &LayoutRegistry<H>) -> Neighbors<'_> {
        let renderable = |doc: &&Document| registry.contains(&doc.layout);
        Neighbors {
            newer: self.published[..index].iter().rev().find(renderable),
            older: self.published[index + 1..].iter().find(renderable),
        }
    }

    /// Resolve a single document, draft or published, for previewing.
    ///
    /// Navigation matches [`Self::render_plan`]. Returns `None` if no
    /// document has this identity.
    pub fn preview<'a, H>(
        &'a self,
        id: &DocumentId,
        registry: &'a LayoutRegistry<H>,
    ) -> Option<Result<RenderPage<'a, H>, DocumentError>> {
        let document = self.get(id)?;
        let neighbors = self
            .position(id)
            .map(|index| self.renderable_neighbors(index, registry))
            .unwrap_or_default();
        Some(
            registry
                .resolve(&document.layout)
                .map(|layout| RenderPage {
                    document,
                    layout,
                    newer: neighbors.newer,
                    older: neighbors.older,
                })
                .map_err(|kind| kind.at(&document.source)),
        )
    }
}

fn duplicate(first: &Document, second: &Document) -> DocumentError {
    ErrorKind::DuplicateDocumentIdentity {
        id: second.id.to_string(),
        first: first.source.clone(),
    }
    .at(&second.source)
}

// ============================================================================
// Render plan
// ============================================================================

/// A published document ready for the external renderer.
#[derive(Debug)]
pub struct RenderPage<'a, H> {
    pub document: &'a Document,
    pub layout: &'a H,
    pub newer: Option<&'a Document>,
    pub older: Option<&'a Document>,
}

/// Output of [`Corpus::render_plan`].
#[derive(Debug)]
pub struct RenderPlan<'a, H> {
    /// Renderable documents in listing order.
    pub pages: Vec<RenderPage<'a, H>>,
    /// Documents skipped because their layout is unknown.
    pub skipped: Vec<DocumentError>,
}

// ============================================================================
// Ingestion
// ============================================================================

/// Ingest documents one after another.
///
/// Per-document failures land in [`Ingestion::rejected`].
///
/// # Errors
///
/// Aborts with [`ErrorKind::DuplicateDocumentIdentity`] if two published
/// documents, or two drafts, share an identity; nothing is returned from
/// such a run.
pub fn ingest(sources: impl IntoIterator<Item = SourceDocument>) -> Result<Ingestion, DocumentError> {
    assemble(sources.into_iter().map(|source| process(&source)).collect())
}

/// Like [`ingest`], processing documents on the rayon thread pool.
///
/// Results keep input order, so the outcome is identical to [`ingest`].
#[cfg(feature = "parallel")]
pub fn ingest_parallel(sources: Vec<SourceDocument>) -> Result<Ingestion, DocumentError> {
    use rayon::prelude::*;

    assemble(sources.par_iter().map(process).collect())
}

fn assemble(results: Vec<Result<Document, DocumentError>>) -> Result<Ingestion, DocumentError> {
    let mut rejected = Vec::new();
    let mut documents = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(doc) => documents.push(doc),
            Err(err) => rejected.push(err),
        }
    }

    Ok(Ingestion {
        corpus: Corpus::build(documents)?,
        rejected,
    })
}
