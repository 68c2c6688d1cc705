use std::sync::RwLock;

use async_trait::async_trait;

use catalog_domain::Document;

use super::r#trait::{Ack, PersistenceGateway};
use crate::error::GatewayError;

/// In-memory document slot.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    slot: RwLock<Option<Document>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            slot: RwLock::new(Some(document)),
        }
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryPersistence {
    async fn load(&self) -> Result<Document, GatewayError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| GatewayError::Unavailable("lock poisoned".to_string()))?;
        slot.clone()
            .ok_or_else(|| GatewayError::NotFound("no document saved".to_string()))
    }

    async fn save(&self, document: &Document) -> Result<Ack, GatewayError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| GatewayError::Unavailable("lock poisoned".to_string()))?;
        *slot = Some(document.clone());
        Ok(Ack::now())
    }
}
