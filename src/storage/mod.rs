//! Object storage for source PDFs and extracted XML
//!
//! The workflow only needs `get` and `put`, so that is all the trait
//! exposes. Production uses S3; tests use an in-memory store.

#[cfg(test)]
mod memory;
mod s3_client;
mod types;

use async_trait::async_trait;

use crate::error::StorageError;

#[cfg(test)]
pub use memory::MemoryObjectStore;
pub use s3_client::S3Client;
pub use types::*;

/// Minimal object store capability
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes and user metadata
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StorageObject, StorageError>;

    /// Write an object, replacing any existing one at the same key
    async fn put_object(&self, bucket: &str, object: StorageObject) -> Result<(), StorageError>;
}
