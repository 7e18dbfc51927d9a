//! Upload ingestion: validate a segment payload, store the blob, record it.

use crate::background::BackgroundTasks;
use crate::error::{ApiError, ApiResult};
use crate::sequence::SegmentSequencer;
use crate::streams::{AUDIO_PREFIX, StreamRegistry};
use bytes::Bytes;
use silt_core::config::AppConfig;
use silt_metadata::MetadataStore;
use silt_metadata::models::SegmentRow;
use silt_storage::BlobStore;
use std::sync::Arc;

/// File extension given to stored segment blobs.
pub const SEGMENT_EXTENSION: &str = "opus";

/// Ingests uploaded audio segments for a stream.
///
/// The blob write is synchronous; the caller observes success once the blob
/// is durable. The segment index row is persisted in the background and may
/// lag behind the blob, or go missing entirely if the process dies first.
pub struct UploadIngestion {
    config: Arc<AppConfig>,
    registry: Arc<StreamRegistry>,
    metadata: Arc<dyn MetadataStore>,
    storage: Arc<dyn BlobStore>,
    sequencer: Arc<SegmentSequencer>,
    background: BackgroundTasks,
}

impl UploadIngestion {
    pub fn new(
        config: Arc<AppConfig>,
        registry: Arc<StreamRegistry>,
        metadata: Arc<dyn MetadataStore>,
        storage: Arc<dyn BlobStore>,
        sequencer: Arc<SegmentSequencer>,
        background: BackgroundTasks,
    ) -> Self {
        Self {
            config,
            registry,
            metadata,
            storage,
            sequencer,
            background,
        }
    }

    /// Ingest one segment payload for the stream the admin token resolves
    /// to. Returns the public URL the segment will be served from.
    pub async fn ingest(&self, admin_id: &str, payload: Bytes) -> ApiResult<String> {
        let stream_public_id = self.registry.resolve_admin(admin_id).await?;

        let max = self.config.upload.max_segment_bytes;
        if payload.is_empty() {
            return Err(ApiError::BadRequest("empty audio payload".to_string()));
        }
        if payload.len() > max {
            return Err(ApiError::BadRequest(format!(
                "audio payload of {} bytes exceeds the {max} byte limit",
                payload.len()
            )));
        }

        let segment_id = self.sequencer.next(&stream_public_id).await?;
        let relative = format!("{stream_public_id}/{segment_id}.{SEGMENT_EXTENSION}");

        self.storage
            .put(&format!("{AUDIO_PREFIX}/{relative}"), payload)
            .await?;

        let segment_url = self.config.file_url(&relative);

        // Respond now; the index row follows. A failed insert leaves the
        // blob in place and is only logged.
        let metadata = self.metadata.clone();
        let row = SegmentRow {
            segment_id: segment_id.clone(),
            stream_public_id: stream_public_id.clone(),
            segment_url: segment_url.clone(),
        };
        self.background.submit("segment-index", async move {
            metadata.insert_segment(&row).await.map_err(|e| {
                format!(
                    "segment {} of stream {}: {e}",
                    row.segment_id, row.stream_public_id
                )
            })
        });

        tracing::debug!(
            stream = %stream_public_id,
            segment = %segment_id,
            "segment ingested"
        );
        Ok(segment_url)
    }
}
