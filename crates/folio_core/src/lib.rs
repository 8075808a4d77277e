//! Publishing pipeline core for dated essay corpora.
//!
//! Turns raw documents into a read-only [`Corpus`]:
//!
//! - [`document`]: split front matter from body
//! - [`identity`]: derive `YYYY-MM-DD-slug` identities from storage paths
//! - [`lifecycle`]: classify documents as draft or published
//! - [`layout`]: resolve layout names against a caller-supplied registry
//! - [`corpus`]: order published documents and index everything by identity
//!
//! The crate performs no I/O. Reading files and rendering templates belong
//! to the caller.
//!
//! # Example
//!
//! ```
//! use folio_core::{Collection, LayoutRegistry, SourceDocument, ingest};
//!
//! let ingestion = ingest([
//!     SourceDocument::new("_posts/2018-02-09-b.md", "---\nlayout: post\n---\nB", Collection::Published),
//!     SourceDocument::new("_posts/2018-02-09-a.md", "---\nlayout: post\n---\nA", Collection::Published),
//! ])
//! .unwrap();
//!
//! let registry: LayoutRegistry<&str> = [("post", "post.html")].into_iter().collect();
//! let plan = ingestion.corpus.render_plan(&registry);
//! assert_eq!(plan.pages[0].document.id().to_string(), "2018-02-09-a");
//! ```

pub mod corpus;
pub mod document;
pub mod error;
pub mod identity;
pub mod layout;
pub mod lifecycle;

pub use corpus::{
    Corpus, Document, Ingestion, Neighbors, RenderPage, RenderPlan, SourceDocument, ingest,
    process,
};
#[cfg(feature = "parallel")]
pub use corpus::ingest_parallel;
pub use document::{Metadata, ParsedDocument, parse_document};
pub use error::{DocumentError, ErrorKind, Stage};
pub use identity::{DocumentId, Slug, check_consistency, resolve_identity};
pub use layout::LayoutRegistry;
pub use lifecycle::{Classification, Collection, DEFAULT_LAYOUT, LifecycleState, classify};
