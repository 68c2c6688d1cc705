//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Store operations never fail; these errors come from parsing values that
/// arrive from outside (folder paths, identifiers).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A folder path could not be parsed.
    #[error("invalid folder path: {0}")]
    InvalidPath(String),

    /// A folder path is deeper than the taxonomy (Group/Range/Product).
    #[error("folder path '{path}' has depth {depth}, maximum is {max}")]
    DepthExceeded {
        path: String,
        depth: usize,
        max: usize,
    },

    /// A name slugifies to nothing, so no identifier can be derived from it.
    #[error("'{0}' does not produce a usable identifier")]
    EmptyIdentifier(String),

    /// An identifier was not in slug form.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn empty_identifier(name: impl Into<String>) -> Self {
        Self::EmptyIdentifier(name.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
