use serde::{Serialize, Serializer};
use thiserror::Error;

use catalog_core::DomainError;
use catalog_infra::GatewayError;

/// Why a remote folder could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error(transparent)]
    InvalidPath(#[from] DomainError),
}

impl ImportError {
    pub fn empty_segment(segment: &str) -> Self {
        Self::InvalidPath(DomainError::empty_identifier(segment))
    }
}

/// Per-item failure of a push or import batch.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Serialized as its display message.
impl Serialize for ActionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
