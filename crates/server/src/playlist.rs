//! Playlist window selection over the segment log.

use crate::error::{ApiError, ApiResult};
use serde::Serialize;
use silt_core::{PLAYLIST_WINDOW, TokenMinter};
use silt_metadata::MetadataStore;
use silt_metadata::models::SegmentRow;
use std::sync::Arc;

/// Where a window without a cursor starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowStart {
    /// The first segments in insertion order.
    #[default]
    Start,
    /// The most recent segments, in ascending order.
    Latest,
    /// A uniformly chosen contiguous window ("tune in at random").
    Random,
}

impl WindowStart {
    /// Parse the `?start=` query value.
    pub fn parse(value: Option<&str>) -> ApiResult<Self> {
        match value {
            None | Some("start") => Ok(Self::Start),
            Some("latest") => Ok(Self::Latest),
            Some("random") => Ok(Self::Random),
            Some(other) => Err(ApiError::BadRequest(format!(
                "unknown playlist start: {other}"
            ))),
        }
    }
}

/// Wire form of a playlist entry.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentEntry {
    #[serde(rename = "segmentID")]
    pub segment_id: String,
    #[serde(rename = "streamPublicID")]
    pub stream_public_id: String,
    #[serde(rename = "segmentURL")]
    pub segment_url: String,
}

impl From<SegmentRow> for SegmentEntry {
    fn from(row: SegmentRow) -> Self {
        Self {
            segment_id: row.segment_id,
            stream_public_id: row.stream_public_id,
            segment_url: row.segment_url,
        }
    }
}

/// Read path over a stream's append-only segment log.
pub struct SegmentLog {
    metadata: Arc<dyn MetadataStore>,
    tokens: TokenMinter,
}

impl SegmentLog {
    pub fn new(metadata: Arc<dyn MetadataStore>, tokens: TokenMinter) -> Self {
        Self { metadata, tokens }
    }

    /// Select a playlist window, capped at [`PLAYLIST_WINDOW`] entries.
    ///
    /// A supplied cursor wins over `start`; a stream with no segments
    /// yields an empty list, not an error.
    pub async fn select_window(
        &self,
        stream_public_id: &str,
        cursor: Option<&str>,
        start: WindowStart,
    ) -> ApiResult<Vec<SegmentEntry>> {
        let limit = PLAYLIST_WINDOW as i64;

        let rows = match cursor {
            Some(segment_id) => {
                self.metadata
                    .segments_after(stream_public_id, segment_id, limit)
                    .await?
            }
            None => match start {
                WindowStart::Start => {
                    self.metadata
                        .segments_from_start(stream_public_id, limit)
                        .await?
                }
                WindowStart::Latest => {
                    self.metadata
                        .segments_latest(stream_public_id, limit)
                        .await?
                }
                WindowStart::Random => self.random_window(stream_public_id).await?,
            },
        };

        Ok(rows.into_iter().map(SegmentEntry::from).collect())
    }

    /// A stream with more than a window's worth of segments gets a window
    /// starting at a uniformly drawn offset in `[0, count - PLAYLIST_WINDOW]`,
    /// so the result is always exactly one full window. Smaller streams are
    /// returned whole.
    async fn random_window(&self, stream_public_id: &str) -> ApiResult<Vec<SegmentRow>> {
        let limit = PLAYLIST_WINDOW as i64;
        let count = self.metadata.count_segments(stream_public_id).await?;

        if count == 0 {
            return Ok(Vec::new());
        }

        let offset = if count > limit {
            self.tokens.uniform_random_int(0, (count - limit + 1) as u64) as i64
        } else {
            0
        };

        Ok(self
            .metadata
            .segments_at_offset(stream_public_id, offset, limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_core::config::TokenConfig;
    use silt_core::token::format_segment_id;
    use silt_metadata::SqliteStore;

    async fn log_with_segments(count: u64) -> (tempfile::TempDir, SegmentLog) {
        let temp = tempfile::tempdir().unwrap();
        let store: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(temp.path().join("metadata.db"))
                .await
                .unwrap(),
        );
        for n in 0..count {
            store
                .insert_segment(&SegmentRow {
                    segment_id: format_segment_id(n),
                    stream_public_id: "pub1".to_string(),
                    segment_url: format!("http://files.test/pub1/{n}.opus"),
                })
                .await
                .unwrap();
        }
        let tokens = TokenMinter::new(&TokenConfig::default()).unwrap();
        (temp, SegmentLog::new(store, tokens))
    }

    fn ids(entries: &[SegmentEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.segment_id.as_str()).collect()
    }

    #[test]
    fn parses_start_values() {
        assert_eq!(WindowStart::parse(None).unwrap(), WindowStart::Start);
        assert_eq!(WindowStart::parse(Some("start")).unwrap(), WindowStart::Start);
        assert_eq!(WindowStart::parse(Some("latest")).unwrap(), WindowStart::Latest);
        assert_eq!(WindowStart::parse(Some("random")).unwrap(), WindowStart::Random);
        assert!(WindowStart::parse(Some("sideways")).is_err());
    }

    #[tokio::test]
    async fn start_window_returns_first_ten() {
        let (_temp, log) = log_with_segments(12).await;
        let window = log
            .select_window("pub1", None, WindowStart::Start)
            .await
            .unwrap();
        assert_eq!(window.len(), 10);
        assert_eq!(ids(&window)[0], "00000000");
        assert_eq!(ids(&window)[9], "00000009");
    }

    #[tokio::test]
    async fn latest_window_is_ascending_tail() {
        let (_temp, log) = log_with_segments(12).await;
        let window = log
            .select_window("pub1", None, WindowStart::Latest)
            .await
            .unwrap();
        assert_eq!(ids(&window)[0], "00000002");
        assert_eq!(ids(&window)[9], "00000011");
    }

    #[tokio::test]
    async fn cursor_window_follows_cursor() {
        let (_temp, log) = log_with_segments(12).await;
        let window = log
            .select_window("pub1", Some("00000005"), WindowStart::Start)
            .await
            .unwrap();
        assert_eq!(
            ids(&window),
            vec!["00000006", "00000007", "00000008", "00000009", "00000010", "00000011"]
        );
    }

    #[tokio::test]
    async fn random_window_is_full_and_contiguous() {
        let (_temp, log) = log_with_segments(25).await;

        for _ in 0..20 {
            let window = log
                .select_window("pub1", None, WindowStart::Random)
                .await
                .unwrap();
            assert_eq!(window.len(), 10);

            let first: u64 = window[0].segment_id.parse().unwrap();
            assert!(first <= 15, "offset {first} cannot yield a full window");
            for (i, entry) in window.iter().enumerate() {
                assert_eq!(entry.segment_id, format_segment_id(first + i as u64));
            }
        }
    }

    #[tokio::test]
    async fn random_window_returns_small_streams_whole() {
        let (_temp, log) = log_with_segments(7).await;
        let window = log
            .select_window("pub1", None, WindowStart::Random)
            .await
            .unwrap();
        assert_eq!(window.len(), 7);
        assert_eq!(ids(&window)[0], "00000000");
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_window() {
        let (_temp, log) = log_with_segments(0).await;
        for start in [WindowStart::Start, WindowStart::Latest, WindowStart::Random] {
            let window = log.select_window("pub1", None, start).await.unwrap();
            assert!(window.is_empty());
        }
    }
}
