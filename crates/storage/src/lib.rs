//! Bucketed object storage for evidence binaries.
//!
//! [`ObjectStore`] is the seam the server depends on. Three backends:
//!
//! - [`S3Store`]: any S3-compatible service (path-style addressing).
//! - [`LocalStore`]: files under `root/<bucket>/<key>`, served by the API
//!   itself.
//! - [`MemoryStore`]: in-process map for tests, with failure injection.

mod config;
mod local;
mod memory;
mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

pub use config::{StorageBackend, StorageConfig};
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// An object read back from a bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store `bytes` under `bucket/key`, replacing any existing object.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;

    /// Remove an object. Deleting a missing object is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}

/// Build the store selected by `backend`.
pub fn build_store(backend: &StorageBackend) -> Arc<dyn ObjectStore> {
    match backend {
        StorageBackend::Local { root } => Arc::new(LocalStore::new(root.clone())),
        StorageBackend::S3 {
            endpoint_url,
            region,
            access_key_id,
            secret_access_key,
        } => Arc::new(S3Store::new(
            endpoint_url.as_deref(),
            region,
            access_key_id,
            secret_access_key,
        )),
    }
}

/// Reject keys that could escape their bucket: empty, absolute, or
/// containing `.`/`..` segments or backslashes.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
