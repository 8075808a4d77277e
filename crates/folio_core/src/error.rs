//! Error taxonomy for the publishing pipeline.
//!
//! Every stage reports an [`ErrorKind`]. The ingestion driver attaches the
//! storage path of the offending document, producing a [`DocumentError`].

use thiserror::Error;

/// Pipeline stage an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Identity,
    Lifecycle,
    Layout,
    Index,
}

impl Stage {
    /// Short name used as a log prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Identity => "identity",
            Self::Lifecycle => "lifecycle",
            Self::Layout => "layout",
            Self::Index => "index",
        }
    }
}

/// What went wrong with a single document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("metadata key `{key}` is defined more than once (line {line})")]
    DuplicateMetadataKey { key: String, line: usize },

    #[error("metadata block opened with `---` is never closed")]
    UnterminatedMetadataBlock,

    #[error("malformed metadata on line {line}: {reason}")]
    MalformedMetadata { line: usize, reason: &'static str },

    #[error("invalid date in path: {0}")]
    InvalidDateInPath(String),

    #[error("invalid slug `{0}`: only lowercase letters, digits and hyphens are allowed")]
    InvalidSlug(String),

    #[error("metadata `{key}` disagrees with the file name: {reason}")]
    InconsistentMetadata { key: &'static str, reason: String },

    #[error("published document has no date in its file name")]
    MissingPublicationDate,

    #[error("published document declares no layout")]
    MissingLayout,

    #[error("unknown layout `{0}`")]
    UnknownLayout(String),

    #[error("identity `{id}` is already taken by `{first}`")]
    DuplicateDocumentIdentity { id: String, first: String },
}

impl ErrorKind {
    pub const fn stage(&self) -> Stage {
        match self {
            Self::DuplicateMetadataKey { .. }
            | Self::UnterminatedMetadataBlock
            | Self::MalformedMetadata { .. } => Stage::Parse,
            Self::InvalidDateInPath(_) | Self::InvalidSlug(_) | Self::InconsistentMetadata { .. } => {
                Stage::Identity
            }
            Self::MissingPublicationDate | Self::MissingLayout => Stage::Lifecycle,
            Self::UnknownLayout(_) => Stage::Layout,
            Self::DuplicateDocumentIdentity { .. } => Stage::Index,
        }
    }

    /// Attach the storage path of the document this error belongs to.
    pub fn at(self, path: impl Into<String>) -> DocumentError {
        DocumentError {
            path: path.into(),
            kind: self,
        }
    }
}

/// An [`ErrorKind`] tied to the storage path it was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{path}`: {kind}")]
pub struct DocumentError {
    pub path: String,
    pub kind: ErrorKind,
}

impl DocumentError {
    pub const fn stage(&self) -> Stage {
        self.kind.stage()
    }
}
