//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tonearm_common::SongId;

/// A stored song and its playback counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub album: Option<String>,
    pub file_path: String,
    pub duration_secs: Option<i64>,
    pub play_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Play count for a single song, as reported by the plays endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayCount {
    pub id: SongId,
    pub play_count: i64,
}
