//! Metadata store decorator that counts every store access.
//!
//! Used to verify the router rejects malformed path tokens before touching
//! the store.

use async_trait::async_trait;
use silt_metadata::models::{HubRow, SegmentRow, StreamRow};
use silt_metadata::{HubRepo, MetadataResult, MetadataStore, SegmentRepo, StreamRepo};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Delegating store that increments a counter on every call.
pub struct CountingStore {
    inner: Arc<dyn MetadataStore>,
    accesses: Arc<AtomicU64>,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn MetadataStore>) -> (Self, Arc<AtomicU64>) {
        let accesses = Arc::new(AtomicU64::new(0));
        (
            Self {
                inner,
                accesses: accesses.clone(),
            },
            accesses,
        )
    }

    fn touch(&self) {
        self.accesses.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StreamRepo for CountingStore {
    async fn create_stream(&self, stream: &StreamRow) -> MetadataResult<()> {
        self.touch();
        self.inner.create_stream(stream).await
    }

    async fn get_stream_by_admin(&self, admin_id: &str) -> MetadataResult<Option<StreamRow>> {
        self.touch();
        self.inner.get_stream_by_admin(admin_id).await
    }
}

#[async_trait]
impl SegmentRepo for CountingStore {
    async fn insert_segment(&self, segment: &SegmentRow) -> MetadataResult<()> {
        self.touch();
        self.inner.insert_segment(segment).await
    }

    async fn count_segments(&self, stream_public_id: &str) -> MetadataResult<i64> {
        self.touch();
        self.inner.count_segments(stream_public_id).await
    }

    async fn segments_from_start(
        &self,
        stream_public_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        self.touch();
        self.inner.segments_from_start(stream_public_id, limit).await
    }

    async fn segments_latest(
        &self,
        stream_public_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        self.touch();
        self.inner.segments_latest(stream_public_id, limit).await
    }

    async fn segments_after(
        &self,
        stream_public_id: &str,
        segment_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        self.touch();
        self.inner
            .segments_after(stream_public_id, segment_id, limit)
            .await
    }

    async fn segments_at_offset(
        &self,
        stream_public_id: &str,
        offset: i64,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        self.touch();
        self.inner
            .segments_at_offset(stream_public_id, offset, limit)
            .await
    }
}

#[async_trait]
impl HubRepo for CountingStore {
    async fn insert_hub(&self, hub: &HubRow) -> MetadataResult<()> {
        self.touch();
        self.inner.insert_hub(hub).await
    }

    async fn get_hub(
        &self,
        stream_public_id: &str,
        hub_id: &str,
    ) -> MetadataResult<Option<HubRow>> {
        self.touch();
        self.inner.get_hub(stream_public_id, hub_id).await
    }

    async fn list_hubs(&self, stream_public_id: &str) -> MetadataResult<Vec<HubRow>> {
        self.touch();
        self.inner.list_hubs(stream_public_id).await
    }

    async fn delete_hub(&self, stream_public_id: &str, hub_id: &str) -> MetadataResult<u64> {
        self.touch();
        self.inner.delete_hub(stream_public_id, hub_id).await
    }
}

#[async_trait]
impl MetadataStore for CountingStore {
    async fn migrate(&self) -> MetadataResult<()> {
        self.inner.migrate().await
    }

    async fn health_check(&self) -> MetadataResult<()> {
        self.inner.health_check().await
    }
}
