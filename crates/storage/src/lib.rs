//! Blob storage abstraction and backends for silt.
//!
//! Segment audio blobs are stored write-by-path under a root directory,
//! namespaced by stream. The server derives keys; backends only enforce
//! that keys stay under the root.

pub mod error;
pub mod filesystem;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use filesystem::FilesystemBackend;
pub use traits::BlobStore;

use silt_core::config::StorageConfig;
use std::sync::Arc;

/// Create a blob store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
    }
}
