//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Absolute base URL the API is reached at; playlist and admin URLs in
    /// responses are minted from this.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Absolute base URL audio segments are served from (typically a static
    /// file host in front of the storage root's `audio/` directory).
    #[serde(default = "default_file_base_url")]
    pub file_base_url: String,
    /// Blob storage backend.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata store backend.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Stream token shape.
    #[serde(default)]
    pub tokens: TokenConfig,
    /// Upload ingestion limits.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Hub federation settings.
    #[serde(default)]
    pub hubs: HubConfig,
}

impl AppConfig {
    /// Mint an absolute URL under the public API base.
    pub fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }

    /// Mint an absolute URL under the file-serving base.
    pub fn file_url(&self, path: &str) -> String {
        join_url(&self.file_base_url, path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            public_base_url: default_public_base_url(),
            file_base_url: default_file_base_url(),
            storage: StorageConfig::default(),
            metadata: MetadataConfig::default(),
            tokens: TokenConfig::default(),
            upload: UploadConfig::default(),
            hubs: HubConfig::default(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Blob storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for segment blobs.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/storage"),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/metadata.db"),
        }
    }
}

/// Shape of stream capability tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token length in characters.
    #[serde(default = "default_token_length")]
    pub length: usize,
    /// Characters tokens are drawn from.
    #[serde(default = "default_token_alphabet")]
    pub alphabet: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            length: default_token_length(),
            alphabet: default_token_alphabet(),
        }
    }
}

/// Upload ingestion configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Hard ceiling on a single segment payload, in bytes.
    #[serde(default = "default_max_segment_bytes")]
    pub max_segment_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_segment_bytes: default_max_segment_bytes(),
        }
    }
}

/// Hub federation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HubConfig {
    /// Timeout for outbound hub notification calls, in seconds. An
    /// unreachable hub must not hang the registering request.
    #[serde(default = "default_hub_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_hub_timeout_secs(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_file_base_url() -> String {
    "http://127.0.0.1:8080/audio".to_string()
}

fn default_token_length() -> usize {
    32
}

fn default_token_alphabet() -> String {
    "0123456789abcdefghijklmnopqrstuvwxyz".to_string()
}

fn default_max_segment_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_hub_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.tokens.length, 32);
        assert_eq!(config.upload.max_segment_bytes, 4 * 1024 * 1024);
        assert_eq!(config.hubs.timeout_secs, 10);
    }

    #[test]
    fn url_minting_normalizes_slashes() {
        let config = AppConfig {
            public_base_url: "https://ga.ge/".to_string(),
            file_base_url: "https://ga.ge/audio".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.public_url("abc/admin"), "https://ga.ge/abc/admin");
        assert_eq!(config.file_url("/abc/0.opus"), "https://ga.ge/audio/abc/0.opus");
    }
}
