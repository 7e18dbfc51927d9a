//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;

/// Stream record.
///
/// `public_id` grants playlist reads; `admin_id` grants uploads and hub
/// management. A stream record is immutable once created.
#[derive(Debug, Clone, FromRow)]
pub struct StreamRow {
    pub public_id: String,
    pub admin_id: String,
    pub created_at: OffsetDateTime,
}

/// Segment record. Insertion order is the authoritative playback order;
/// `segment_id` is a zero-padded counter unique within its stream.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SegmentRow {
    pub segment_id: String,
    pub stream_public_id: String,
    pub segment_url: String,
}

/// Hub registration record. `hub_id` is assigned by the remote hub at
/// registration time, not generated locally.
#[derive(Debug, Clone, FromRow)]
pub struct HubRow {
    pub hub_id: String,
    pub hub_url: String,
    pub stream_public_id: String,
}
