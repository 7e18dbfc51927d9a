//! Per-stream segment sequence allocation.
//!
//! Segment counters are cached in-process to avoid a COUNT query per
//! upload. The persisted row set is the ground truth: the cache is seeded
//! from a real count the first time a stream is touched in this process's
//! lifetime and only ever matches or trails the store within one uptime.

use silt_core::token::format_segment_id;
use silt_metadata::{MetadataResult, MetadataStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Serialized allocator of zero-padded segment ids.
///
/// Allocation for a given stream is serialized through the map lock;
/// concurrent uploads to the same stream can never be issued the same id.
pub struct SegmentSequencer {
    metadata: Arc<dyn MetadataStore>,
    counts: Mutex<HashMap<String, u64>>,
}

impl SegmentSequencer {
    /// Create a sequencer over the given store.
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            metadata,
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate the next segment id for a stream.
    pub async fn next(&self, stream_public_id: &str) -> MetadataResult<String> {
        let mut counts = self.counts.lock().await;

        let next = match counts.get(stream_public_id).copied() {
            Some(n) => n,
            // First touch this process lifetime: seed from the store.
            None => self.metadata.count_segments(stream_public_id).await? as u64,
        };

        counts.insert(stream_public_id.to_string(), next + 1);
        Ok(format_segment_id(next))
    }
}
