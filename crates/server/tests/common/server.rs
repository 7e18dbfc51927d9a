//! Server test utilities.

use super::counting::CountingStore;
use super::fixtures::{audio_form_body, multipart_content_type};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use silt_core::config::{AppConfig, MetadataConfig, StorageConfig};
use silt_metadata::{MetadataStore, SqliteStore};
use silt_server::{AppState, create_router};
use silt_storage::{BlobStore, FilesystemBackend};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;
use tower::ServiceExt;

/// Public API base URL used in test configuration.
#[allow(dead_code)]
pub const PUBLIC_BASE: &str = "http://silt.test";

/// File-serving base URL used in test configuration.
#[allow(dead_code)]
pub const FILE_BASE: &str = "http://files.silt.test/audio";

/// A stream created through the API, with its tokens recovered from the
/// response envelope.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CreatedStream {
    pub admin_id: String,
    pub public_id: String,
}

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub store_accesses: Arc<AtomicU64>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("failed to create temp directory");

        let storage_path = temp_dir.path().join("storage");
        let storage: Arc<dyn BlobStore> = Arc::new(
            FilesystemBackend::new(&storage_path)
                .await
                .expect("failed to create storage backend"),
        );

        let db_path = temp_dir.path().join("metadata.db");
        let sqlite: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("failed to create metadata store"),
        );
        let (counting, store_accesses) = CountingStore::new(sqlite);
        let metadata: Arc<dyn MetadataStore> = Arc::new(counting);

        let mut config = AppConfig {
            public_base_url: PUBLIC_BASE.to_string(),
            file_base_url: FILE_BASE.to_string(),
            storage: StorageConfig::Filesystem { path: storage_path },
            metadata: MetadataConfig::Sqlite { path: db_path },
            ..AppConfig::default()
        };
        modifier(&mut config);

        let state =
            AppState::new(config, metadata, storage).expect("failed to build app state");
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store_accesses,
            _temp_dir: temp_dir,
        }
    }

    /// Number of metadata store accesses so far.
    pub fn store_access_count(&self) -> u64 {
        self.store_accesses.load(Ordering::SeqCst)
    }

    /// Drain background persistence tasks.
    pub async fn wait_background(&self) {
        self.state.background.wait_idle().await;
    }

    /// Send a request and return status and raw body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        let body = match body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        (status, bytes.to_vec())
    }

    /// Send a request and parse the response as JSON.
    pub async fn request_json(
        &self,
        method: &str,
        uri: &str,
        body: Option<Vec<u8>>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, uri, None, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Create a stream through the API and recover its tokens from the
    /// envelope URLs.
    pub async fn create_stream(&self) -> CreatedStream {
        let (status, json) = self.request_json("POST", "/stream", None).await;
        assert_eq!(status, StatusCode::OK, "stream creation failed: {json}");

        let admin_url = json["admin"].as_str().expect("missing admin URL");
        let playlist_url = json["publicPlaylistURL"]
            .as_str()
            .expect("missing playlist URL");

        // admin: {base}/{adminID}/admin; playlist: {base}/{publicID}
        let admin_id = admin_url
            .trim_start_matches(&format!("{PUBLIC_BASE}/"))
            .trim_end_matches("/admin")
            .to_string();
        let public_id = playlist_url
            .trim_start_matches(&format!("{PUBLIC_BASE}/"))
            .to_string();

        CreatedStream {
            admin_id,
            public_id,
        }
    }

    /// Upload one audio segment; returns status and response body text.
    pub async fn upload(&self, admin_id: &str, data: &[u8]) -> (StatusCode, String) {
        let (status, body) = self
            .request(
                "POST",
                &format!("/{admin_id}"),
                Some(&multipart_content_type()),
                Some(audio_form_body(data)),
            )
            .await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    /// Upload `count` segments, draining background indexing after each so
    /// row insertion order matches upload order.
    pub async fn seed_segments(&self, admin_id: &str, count: usize) {
        for n in 0..count {
            let (status, body) = self.upload(admin_id, format!("segment-{n}").as_bytes()).await;
            assert_eq!(status, StatusCode::OK, "upload {n} failed: {body}");
            self.wait_background().await;
        }
    }
}
