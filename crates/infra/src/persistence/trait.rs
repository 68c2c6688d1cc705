use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_domain::Document;

use crate::error::GatewayError;

/// Acknowledgement of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub saved_at: DateTime<Utc>,
}

impl Ack {
    pub fn now() -> Self {
        Self {
            saved_at: Utc::now(),
        }
    }
}

/// Whole-document load/save.
///
/// `load` returns `GatewayError::NotFound` when nothing has been saved yet;
/// callers typically start from an empty catalog in that case.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn load(&self) -> Result<Document, GatewayError>;

    async fn save(&self, document: &Document) -> Result<Ack, GatewayError>;
}

#[async_trait]
impl<P> PersistenceGateway for Arc<P>
where
    P: PersistenceGateway + ?Sized,
{
    async fn load(&self) -> Result<Document, GatewayError> {
        (**self).load().await
    }

    async fn save(&self, document: &Document) -> Result<Ack, GatewayError> {
        (**self).save(document).await
    }
}
