//! Metadata store trait and the SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::{HubRow, SegmentRow, StreamRow};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Stream records. Streams are create-and-lookup only; there is no update
/// or delete for the record itself.
#[async_trait]
pub trait StreamRepo {
    /// Persist a new stream. Fails with `AlreadyExists` if either token is
    /// already in use.
    async fn create_stream(&self, stream: &StreamRow) -> MetadataResult<()>;

    /// Look up a stream by its admin token.
    async fn get_stream_by_admin(&self, admin_id: &str) -> MetadataResult<Option<StreamRow>>;
}

/// Segment records for a stream's append-only log. Row insertion order is
/// the playback order every windowed query is defined against.
#[async_trait]
pub trait SegmentRepo {
    /// Append a segment record. Fails with `AlreadyExists` on a duplicate
    /// `(stream, segment)` key; no retry.
    async fn insert_segment(&self, segment: &SegmentRow) -> MetadataResult<()>;

    /// Number of segments recorded for a stream.
    async fn count_segments(&self, stream_public_id: &str) -> MetadataResult<i64>;

    /// The first `limit` segments in insertion order.
    async fn segments_from_start(
        &self,
        stream_public_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>>;

    /// The most recent `limit` segments, restored to ascending order.
    async fn segments_latest(
        &self,
        stream_public_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>>;

    /// Up to `limit` segments strictly after the given segment's insertion
    /// position. A cursor that does not belong to the stream yields an
    /// empty window.
    async fn segments_after(
        &self,
        stream_public_id: &str,
        segment_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>>;

    /// `limit` segments in insertion order, starting `offset` rows in.
    async fn segments_at_offset(
        &self,
        stream_public_id: &str,
        offset: i64,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>>;
}

/// Hub registration records. At most one registration per
/// `(stream, hub_url)` pair.
#[async_trait]
pub trait HubRepo {
    /// Persist a hub registration. Fails with `AlreadyExists` if the hub
    /// URL is already registered for the stream.
    async fn insert_hub(&self, hub: &HubRow) -> MetadataResult<()>;

    /// Look up a registration by the hub-assigned id.
    async fn get_hub(
        &self,
        stream_public_id: &str,
        hub_id: &str,
    ) -> MetadataResult<Option<HubRow>>;

    /// All registrations for a stream, in registration order.
    async fn list_hubs(&self, stream_public_id: &str) -> MetadataResult<Vec<HubRow>>;

    /// Remove a registration. Returns the number of rows removed.
    async fn delete_hub(&self, stream_public_id: &str, hub_id: &str) -> MetadataResult<u64>;
}

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: StreamRepo + SegmentRepo + HubRepo + Send + Sync {
    /// Create the schema if it does not exist.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity.
    async fn health_check(&self) -> MetadataResult<()>;
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS streams (
    public_id  TEXT PRIMARY KEY,
    admin_id   TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS segments (
    segment_id       TEXT NOT NULL,
    stream_public_id TEXT NOT NULL,
    segment_url      TEXT NOT NULL,
    PRIMARY KEY (stream_public_id, segment_id)
);

CREATE INDEX IF NOT EXISTS idx_segments_stream ON segments (stream_public_id);

CREATE TABLE IF NOT EXISTS hubs (
    hub_id           TEXT NOT NULL,
    hub_url          TEXT NOT NULL,
    stream_public_id TEXT NOT NULL,
    UNIQUE (stream_public_id, hub_url)
);

CREATE INDEX IF NOT EXISTS idx_hubs_stream ON hubs (stream_public_id);
"#;

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) a SQLite store at the given path.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MetadataError::Config(format!(
                    "cannot create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection
            // avoids persistent "database is locked" failures under axum
            // concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    fn map_insert_error(e: sqlx::Error, what: String) -> MetadataError {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return MetadataError::AlreadyExists(what);
            }
        }
        MetadataError::Database(e)
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl StreamRepo for SqliteStore {
    async fn create_stream(&self, stream: &StreamRow) -> MetadataResult<()> {
        sqlx::query("INSERT INTO streams (public_id, admin_id, created_at) VALUES (?, ?, ?)")
            .bind(&stream.public_id)
            .bind(&stream.admin_id)
            .bind(stream.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Self::map_insert_error(e, format!("stream {}", stream.public_id))
            })?;
        Ok(())
    }

    async fn get_stream_by_admin(&self, admin_id: &str) -> MetadataResult<Option<StreamRow>> {
        let row = sqlx::query_as::<_, StreamRow>(
            "SELECT public_id, admin_id, created_at FROM streams WHERE admin_id = ?",
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl SegmentRepo for SqliteStore {
    async fn insert_segment(&self, segment: &SegmentRow) -> MetadataResult<()> {
        sqlx::query(
            "INSERT INTO segments (segment_id, stream_public_id, segment_url) VALUES (?, ?, ?)",
        )
        .bind(&segment.segment_id)
        .bind(&segment.stream_public_id)
        .bind(&segment.segment_url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Self::map_insert_error(
                e,
                format!(
                    "segment {} of stream {}",
                    segment.segment_id, segment.stream_public_id
                ),
            )
        })?;
        Ok(())
    }

    async fn count_segments(&self, stream_public_id: &str) -> MetadataResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM segments WHERE stream_public_id = ?")
                .bind(stream_public_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn segments_from_start(
        &self,
        stream_public_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        let rows = sqlx::query_as::<_, SegmentRow>(
            "SELECT segment_id, stream_public_id, segment_url FROM segments \
             WHERE stream_public_id = ? ORDER BY rowid ASC LIMIT ?",
        )
        .bind(stream_public_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn segments_latest(
        &self,
        stream_public_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        let mut rows = sqlx::query_as::<_, SegmentRow>(
            "SELECT segment_id, stream_public_id, segment_url FROM segments \
             WHERE stream_public_id = ? ORDER BY rowid DESC LIMIT ?",
        )
        .bind(stream_public_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        // Tail window, restored to playback order.
        rows.reverse();
        Ok(rows)
    }

    async fn segments_after(
        &self,
        stream_public_id: &str,
        segment_id: &str,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        // The cursor subquery is scoped to the same stream: a cursor from
        // another stream resolves to NULL and the window comes back empty.
        let rows = sqlx::query_as::<_, SegmentRow>(
            "SELECT segment_id, stream_public_id, segment_url FROM segments \
             WHERE stream_public_id = ? AND rowid > \
               (SELECT rowid FROM segments WHERE stream_public_id = ? AND segment_id = ?) \
             ORDER BY rowid ASC LIMIT ?",
        )
        .bind(stream_public_id)
        .bind(stream_public_id)
        .bind(segment_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn segments_at_offset(
        &self,
        stream_public_id: &str,
        offset: i64,
        limit: i64,
    ) -> MetadataResult<Vec<SegmentRow>> {
        let rows = sqlx::query_as::<_, SegmentRow>(
            "SELECT segment_id, stream_public_id, segment_url FROM segments \
             WHERE stream_public_id = ? ORDER BY rowid ASC LIMIT ? OFFSET ?",
        )
        .bind(stream_public_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl HubRepo for SqliteStore {
    async fn insert_hub(&self, hub: &HubRow) -> MetadataResult<()> {
        sqlx::query("INSERT INTO hubs (hub_id, hub_url, stream_public_id) VALUES (?, ?, ?)")
            .bind(&hub.hub_id)
            .bind(&hub.hub_url)
            .bind(&hub.stream_public_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Self::map_insert_error(
                    e,
                    format!("hub {} for stream {}", hub.hub_url, hub.stream_public_id),
                )
            })?;
        Ok(())
    }

    async fn get_hub(
        &self,
        stream_public_id: &str,
        hub_id: &str,
    ) -> MetadataResult<Option<HubRow>> {
        let row = sqlx::query_as::<_, HubRow>(
            "SELECT hub_id, hub_url, stream_public_id FROM hubs \
             WHERE stream_public_id = ? AND hub_id = ?",
        )
        .bind(stream_public_id)
        .bind(hub_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_hubs(&self, stream_public_id: &str) -> MetadataResult<Vec<HubRow>> {
        let rows = sqlx::query_as::<_, HubRow>(
            "SELECT hub_id, hub_url, stream_public_id FROM hubs \
             WHERE stream_public_id = ? ORDER BY rowid ASC",
        )
        .bind(stream_public_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_hub(&self, stream_public_id: &str, hub_id: &str) -> MetadataResult<u64> {
        let result = sqlx::query("DELETE FROM hubs WHERE stream_public_id = ? AND hub_id = ?")
            .bind(stream_public_id)
            .bind(hub_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
