//! Draft/published classification.
//!
//! The collection a document was loaded from decides its lifecycle state.
//! Published documents must be complete; drafts may lack a date and fall
//! back to [`DEFAULT_LAYOUT`].

use crate::{document::Metadata, error::ErrorKind, identity::DocumentId};
use std::fmt;

/// Layout assigned to drafts that do not declare one.
pub const DEFAULT_LAYOUT: &str = "default";

/// Top-level bucket a document is ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Published,
    Drafts,
}

impl Collection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Drafts => "drafts",
        }
    }
}

/// Lifecycle state of a classified document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum LifecycleState {
    Draft,
    Published,
}

impl LifecycleState {
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Published => "published",
        })
    }
}

/// Outcome of classifying one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: LifecycleState,
    /// Effective layout name: declared, or [`DEFAULT_LAYOUT`] for drafts.
    pub layout: String,
}

/// Assign a lifecycle state to an identified document.
///
/// # Errors
///
/// For [`Collection::Published`] only:
/// - [`ErrorKind::MissingPublicationDate`] if the identity is undated.
/// - [`ErrorKind::MissingLayout`] if metadata has no non-empty `layout`.
pub fn classify(
    collection: Collection,
    id: &DocumentId,
    metadata: &Metadata,
) -> Result<Classification, ErrorKind> {
    match collection {
        Collection::Published => {
            if !id.is_dated() {
                return Err(ErrorKind::MissingPublicationDate);
            }
            let layout = metadata.layout().ok_or(ErrorKind::MissingLayout)?;
            Ok(Classification {
                state: LifecycleState::Published,
                layout: layout.to_owned(),
            })
        }
        Collection::Drafts => Ok(Classification {
            state: LifecycleState::Draft,
            layout: metadata.layout().unwrap_or(DEFAULT_LAYOUT).to_owned(),
        }),
    }
}
