//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Write-by-path / read-by-path blob storage under a root directory.
///
/// Keys are relative slash-separated paths; backends reject keys that would
/// escape the root.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob at the given key, creating parent directories as
    /// needed. Overwrites are atomic with respect to readers.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Read a blob. Fails with `NotFound` if the key does not exist.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Provision an empty namespace (directory) under the root.
    /// Idempotent: provisioning an existing namespace succeeds.
    async fn ensure_namespace(&self, key: &str) -> StorageResult<()>;
}
