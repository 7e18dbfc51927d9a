//! Stream registry: creation and admin-token lookup.

use crate::error::{ApiError, ApiResult};
use serde::Serialize;
use silt_core::TokenMinter;
use silt_core::config::AppConfig;
use silt_metadata::MetadataStore;
use silt_metadata::models::StreamRow;
use silt_storage::BlobStore;
use std::sync::Arc;
use time::OffsetDateTime;

/// Storage prefix segment blobs live under, namespaced by stream.
pub const AUDIO_PREFIX: &str = "audio";

/// User-facing view of a stream: the three URLs a stream owner needs.
/// The admin token only ever appears inside admin-scoped URLs; it is never
/// included in playlist responses.
#[derive(Debug, Clone, Serialize)]
pub struct StreamEnvelope {
    /// Admin metadata endpoint (embeds the admin token).
    pub admin: String,
    /// Public playlist endpoint.
    #[serde(rename = "publicPlaylistURL")]
    pub public_playlist_url: String,
    /// Hub listing endpoint (embeds the admin token).
    #[serde(rename = "hubManagementURL")]
    pub hub_management_url: String,
}

/// Owns stream lifecycle: token minting, namespace provisioning, lookup.
pub struct StreamRegistry {
    config: Arc<AppConfig>,
    metadata: Arc<dyn MetadataStore>,
    storage: Arc<dyn BlobStore>,
    tokens: TokenMinter,
}

impl StreamRegistry {
    pub fn new(
        config: Arc<AppConfig>,
        metadata: Arc<dyn MetadataStore>,
        storage: Arc<dyn BlobStore>,
        tokens: TokenMinter,
    ) -> Self {
        Self {
            config,
            metadata,
            storage,
            tokens,
        }
    }

    /// Create a stream: mint both tokens, persist the record, provision the
    /// blob namespace.
    ///
    /// The record is persisted before provisioning so the store stays the
    /// single source of truth; provisioning is idempotent and is repeated
    /// implicitly by segment writes.
    pub async fn create(&self) -> ApiResult<StreamRow> {
        let public_id = self.tokens.generate();
        let mut admin_id = self.tokens.generate();
        while admin_id == public_id {
            admin_id = self.tokens.generate();
        }

        let stream = StreamRow {
            public_id,
            admin_id,
            created_at: OffsetDateTime::now_utc(),
        };

        self.metadata.create_stream(&stream).await?;
        self.storage
            .ensure_namespace(&format!("{AUDIO_PREFIX}/{}", stream.public_id))
            .await?;

        tracing::info!(stream = %stream.public_id, "stream created");
        Ok(stream)
    }

    /// Look up a stream by admin token.
    pub async fn fetch(&self, admin_id: &str) -> ApiResult<StreamRow> {
        self.metadata
            .get_stream_by_admin(admin_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("stream not found".to_string()))
    }

    /// Resolve an admin token to the stream's public id.
    pub async fn resolve_admin(&self, admin_id: &str) -> ApiResult<String> {
        Ok(self.fetch(admin_id).await?.public_id)
    }

    /// Build the user-facing URL envelope for a stream.
    pub fn envelope(&self, stream: &StreamRow) -> StreamEnvelope {
        StreamEnvelope {
            admin: self.config.public_url(&format!("{}/admin", stream.admin_id)),
            public_playlist_url: self.config.public_url(&stream.public_id),
            hub_management_url: self.config.public_url(&format!("{}/hubs", stream.admin_id)),
        }
    }
}
