//! Playback accounting.
//!
//! A request counts as a playback when the negotiated window starts at byte
//! zero: the full-content case, and partial requests such as `bytes=0-` that
//! players send when they begin a track. Anything starting later is a seek
//! inside a track that is already playing and is not counted. The status code
//! is deliberately not part of the rule.
//!
//! There is no deduplication: N qualifying requests add N plays.

use async_trait::async_trait;
use tonearm_common::{Error, Result, SongId};
use tonearm_db::pool::{get_conn, DbPool};
use tonearm_db::queries::songs;

use super::range::DeliveryPlan;

/// Whether serving `plan` starts a new playback.
pub fn should_count(plan: &DeliveryPlan) -> bool {
    plan.start() == Some(0)
}

/// Persistent play counter. Increments must be atomic at the storage layer.
#[async_trait]
pub trait PlayCounter: Send + Sync {
    async fn increment_play_count(&self, song_id: SongId) -> Result<()>;
}

/// Play counter stored in the `songs` table.
#[derive(Clone)]
pub struct SqlitePlayCounter {
    pool: DbPool,
}

impl SqlitePlayCounter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayCounter for SqlitePlayCounter {
    async fn increment_play_count(&self, song_id: SongId) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            songs::increment_play_count(&conn, song_id)
        })
        .await
        .map_err(|e| Error::internal(format!("play count task failed: {e}")))?
    }
}

/// Count a playback for `song_id` if `plan` qualifies.
///
/// At most one increment is attempted. A failed increment is logged and
/// otherwise ignored; it never changes the response. Returns whether an
/// increment was attempted.
pub async fn record_playback(
    counter: &dyn PlayCounter,
    song_id: SongId,
    plan: &DeliveryPlan,
) -> bool {
    if !should_count(plan) {
        tracing::trace!(%song_id, start = ?plan.start(), "Not a playback start");
        return false;
    }

    match counter.increment_play_count(song_id).await {
        Ok(()) => tracing::debug!(%song_id, "Counted playback"),
        Err(e) => tracing::warn!(%song_id, error = %e, "Failed to record playback"),
    }

    true
}
