//! Unified error handling for the accessor layer.

use crate::store::StoreError;
use thiserror::Error;

/// Convenience type alias for Results using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by accessor operations.
///
/// Every failure is local to a single operation: there is no retry logic,
/// and no partially persisted state survives an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("package '{0}' not found")]
    PackageNotFound(String),

    #[error("section '{0}' not found")]
    SectionNotFound(String),

    #[error("option '{0}' not found")]
    OptionNotFound(String),

    #[error("no section of type '{ty}' at index {index}")]
    NoSuchIndex { ty: String, index: isize },

    /// A section with the requested name already exists under another type.
    #[error("section '{name}' already exists with type '{existing}', requested type '{requested}'")]
    TypeConflict {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("option '{0}' is not a string")]
    NotAString(String),

    #[error("option '{0}' is not a list")]
    NotAList(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The underlying store failed during load, mutation, or commit.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PackageNotFound(name) => Error::PackageNotFound(name),
            other => Error::Store(other),
        }
    }
}

impl Error {
    /// Get a static label for the error kind, for diagnostics and matching.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::PackageNotFound(_)
            | Self::SectionNotFound(_)
            | Self::OptionNotFound(_)
            | Self::NoSuchIndex { .. } => "not_found",
            Self::TypeConflict { .. } => "conflict",
            Self::NotAString(_) | Self::NotAList(_) => "type_mismatch",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Store(_) => "store",
        }
    }
}
