use std::sync::Arc;

use evidencias_core::files::Buckets;
use evidencias_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: evidencias_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object store holding evidence binaries.
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn buckets(&self) -> Buckets {
        Buckets {
            photos: self.config.storage.photos_bucket.clone(),
            documents: self.config.storage.documents_bucket.clone(),
        }
    }
}
