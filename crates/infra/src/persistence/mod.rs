//! Catalog document persistence boundary.
//!
//! The whole catalog is saved and loaded as one [`Document`]; there is no
//! partial update.
//!
//! [`Document`]: catalog_domain::Document

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryPersistence;
pub use json_file::JsonFilePersistence;
pub use r#trait::{Ack, PersistenceGateway};
