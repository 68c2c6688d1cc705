//! Infrastructure layer: storage and persistence gateways, configuration.

pub mod config;
pub mod error;
pub mod persistence;
pub mod storage;

pub use config::{AppConfig, ConfigIssue};
pub use error::GatewayError;
pub use persistence::{Ack, InMemoryPersistence, JsonFilePersistence, PersistenceGateway};
pub use storage::{
    FileInfo, InMemoryObjectStorage, LocalFsObjectStorage, ObjectStorageGateway, ObjectTree,
    ProductAssets,
};
