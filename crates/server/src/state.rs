//! Application state shared across handlers.

use crate::background::BackgroundTasks;
use crate::federation::HubFederation;
use crate::ingest::UploadIngestion;
use crate::playlist::SegmentLog;
use crate::sequence::SegmentSequencer;
use crate::streams::StreamRegistry;
use silt_core::TokenMinter;
use silt_core::config::AppConfig;
use silt_metadata::MetadataStore;
use silt_storage::BlobStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Blob storage backend.
    pub storage: Arc<dyn BlobStore>,
    /// Token minting and format validation.
    pub tokens: TokenMinter,
    /// Stream registry.
    pub registry: Arc<StreamRegistry>,
    /// Segment log read path.
    pub segment_log: Arc<SegmentLog>,
    /// Upload ingestion.
    pub ingest: Arc<UploadIngestion>,
    /// Hub federation.
    pub federation: Arc<HubFederation>,
    /// Background persistence executor.
    pub background: BackgroundTasks,
}

impl AppState {
    /// Wire up the application components.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        storage: Arc<dyn BlobStore>,
    ) -> Result<Self, silt_core::Error> {
        let config = Arc::new(config);
        let tokens = TokenMinter::new(&config.tokens)?;
        let background = BackgroundTasks::new();

        let registry = Arc::new(StreamRegistry::new(
            config.clone(),
            metadata.clone(),
            storage.clone(),
            tokens.clone(),
        ));
        let segment_log = Arc::new(SegmentLog::new(metadata.clone(), tokens.clone()));
        let sequencer = Arc::new(SegmentSequencer::new(metadata.clone()));
        let ingest = Arc::new(UploadIngestion::new(
            config.clone(),
            registry.clone(),
            metadata.clone(),
            storage.clone(),
            sequencer,
            background.clone(),
        ));
        let federation = Arc::new(HubFederation::new(
            config.clone(),
            registry.clone(),
            metadata.clone(),
            background.clone(),
        )?);

        Ok(Self {
            config,
            metadata,
            storage,
            tokens,
            registry,
            segment_log,
            ingest,
            federation,
            background,
        })
    }
}
