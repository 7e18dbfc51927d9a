//! Metadata store abstraction and implementations for silt.
//!
//! This crate provides the control-plane data model:
//! - Stream records (public/admin capability tokens)
//! - The per-stream append-only segment log
//! - Hub federation registrations

pub mod error;
pub mod models;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use store::{HubRepo, MetadataStore, SegmentRepo, SqliteStore, StreamRepo};

use silt_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}
