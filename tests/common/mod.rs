//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a config and the
//! full [`AppContext`]. The [`TestHarness::with_server`] constructor starts
//! Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tonearm::config::Config;
use tonearm::server::{create_router, AppContext};
use tonearm_common::SongId;
use tonearm_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
use tonearm_db::queries::songs;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database. Song files live in a temp dir owned by the harness.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub media_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, db.clone());
        let media_dir = tempfile::tempdir().expect("failed to create media dir");

        Self { ctx, db, media_dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Write `data` to a file named `file_name` and register it as a song.
    pub fn add_song(&self, file_name: &str, data: &[u8]) -> SongId {
        let path = self.write_media(file_name, data);
        let song = songs::create_song(
            &self.conn(),
            file_name,
            None,
            path.to_str().expect("non-utf8 temp path"),
            None,
        )
        .expect("failed to create song");
        song.id
    }

    pub fn write_media(&self, file_name: &str, data: &[u8]) -> PathBuf {
        let path = self.media_dir.path().join(file_name);
        std::fs::write(&path, data).expect("failed to write media file");
        path
    }

    pub fn play_count(&self, id: SongId) -> i64 {
        songs::get_play_count(&self.conn(), id).expect("failed to read play count")
    }

    /// Wait for the background play count increments to land.
    ///
    /// Returns the count once it reaches `expected`, or whatever it is after
    /// five seconds.
    pub async fn wait_for_play_count(&self, id: SongId, expected: i64) -> i64 {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let count = self.play_count(id);
            if count >= expected || tokio::time::Instant::now() >= deadline {
                return count;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Deterministic test payload: bytes cycle 0..=255.
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(len).collect()
}
