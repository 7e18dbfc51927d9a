//! Hub federation: push a stream's public URL out to external hubs.
//!
//! A hub is notified with a `PUT` carrying the stream's public playlist URL
//! and answers with an opaque id of its own choosing; deregistration sends
//! that id back with a `DELETE`. Outbound calls carry a bounded timeout so
//! an unreachable hub cannot hang the request. Nothing is retried.

use crate::background::BackgroundTasks;
use crate::error::{ApiError, ApiResult};
use crate::streams::StreamRegistry;
use reqwest::header::CONTENT_TYPE;
use silt_core::config::AppConfig;
use silt_metadata::MetadataStore;
use silt_metadata::models::HubRow;
use std::sync::Arc;
use std::time::Duration;

/// Manages hub registrations for streams.
pub struct HubFederation {
    config: Arc<AppConfig>,
    registry: Arc<StreamRegistry>,
    metadata: Arc<dyn MetadataStore>,
    background: BackgroundTasks,
    http: reqwest::Client,
}

impl HubFederation {
    pub fn new(
        config: Arc<AppConfig>,
        registry: Arc<StreamRegistry>,
        metadata: Arc<dyn MetadataStore>,
        background: BackgroundTasks,
    ) -> Result<Self, silt_core::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.hubs.timeout_secs))
            .build()
            .map_err(|e| silt_core::Error::Config(format!("hub HTTP client: {e}")))?;

        Ok(Self {
            config,
            registry,
            metadata,
            background,
            http,
        })
    }

    /// Register a hub for the stream the admin token resolves to.
    ///
    /// The hub is notified synchronously and must answer with a non-empty
    /// id; the local registration row is persisted in the background.
    pub async fn register(&self, hub_url: &str, admin_id: &str) -> ApiResult<()> {
        let stream_public_id = self.registry.resolve_admin(admin_id).await?;

        let hubs = self.metadata.list_hubs(&stream_public_id).await?;
        if hubs.iter().any(|hub| hub.hub_url == hub_url) {
            return Err(ApiError::Conflict(format!(
                "hub {hub_url} already used by stream"
            )));
        }

        let playlist_url = self.config.public_url(&stream_public_id);
        let response = self
            .http
            .put(hub_url)
            .header(CONTENT_TYPE, "text/plain")
            .body(playlist_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| ApiError::Upstream(format!("hub registration failed: {e}")))?;

        let hub_id = response
            .text()
            .await
            .map_err(|e| ApiError::Upstream(format!("hub response unreadable: {e}")))?
            .trim()
            .to_string();

        if hub_id.is_empty() {
            return Err(ApiError::Upstream(
                "hub returned an empty registration id".to_string(),
            ));
        }

        let metadata = self.metadata.clone();
        let row = HubRow {
            hub_id,
            hub_url: hub_url.to_string(),
            stream_public_id,
        };
        self.background.submit("hub-register", async move {
            metadata.insert_hub(&row).await.map_err(|e| {
                format!("hub {} for stream {}: {e}", row.hub_url, row.stream_public_id)
            })
        });

        Ok(())
    }

    /// Deregister a hub by its hub-assigned id.
    ///
    /// Fails `Upstream` only when the outbound `DELETE` cannot be sent at
    /// all; any HTTP response proceeds to best-effort local teardown.
    pub async fn deregister(&self, hub_id: &str, admin_id: &str) -> ApiResult<()> {
        let stream_public_id = self.registry.resolve_admin(admin_id).await?;

        let hub = self
            .metadata
            .get_hub(&stream_public_id, hub_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("hub {hub_id} does not exist")))?;

        let response = self
            .http
            .delete(&hub.hub_url)
            .header(CONTENT_TYPE, "text/plain")
            .body(hub.hub_id.clone())
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("hub removal failed: {e}")))?;

        if !response.status().is_success() {
            tracing::warn!(
                hub = %hub.hub_url,
                status = %response.status(),
                "hub answered removal with an error status; removing local record anyway"
            );
        }

        if let Err(e) = self.metadata.delete_hub(&stream_public_id, hub_id).await {
            tracing::error!(
                hub = %hub.hub_url,
                stream = %stream_public_id,
                error = %e,
                "failed to remove local hub registration"
            );
        }

        Ok(())
    }

    /// List the hub URLs registered for the stream the admin token resolves
    /// to.
    pub async fn list(&self, admin_id: &str) -> ApiResult<Vec<String>> {
        let stream_public_id = self.registry.resolve_admin(admin_id).await?;
        let hubs = self.metadata.list_hubs(&stream_public_id).await?;
        Ok(hubs.into_iter().map(|hub| hub.hub_url).collect())
    }
}
