use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Read size used by the chunked transmitter when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest chunk size accepted from configuration.
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Require an API key on every `/api` route
    #[serde(default)]
    pub enabled: bool,

    /// API key expected in `Authorization: Bearer <key>`
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to `tonearm.db` next to the config file.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Maximum bytes read from an asset per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Content-Type used when the file extension is not a known audio type
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_content_type() -> String {
    "audio/mpeg".to_string()
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            default_content_type: default_content_type(),
        }
    }
}

impl StreamingConfig {
    /// Chunk size as a non-zero value; zero falls back to the default.
    pub fn chunk_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.chunk_size)
            .or_else(|| NonZeroUsize::new(DEFAULT_CHUNK_SIZE))
            .unwrap_or(NonZeroUsize::MIN)
    }
}
