//! Song query operations.
//!
//! The song row is the asset's metadata record: it points at the audio file on
//! disk and owns the play counter. `increment_play_count` is the only writer
//! of `play_count`, and it increments in a single UPDATE so concurrent
//! requests never lose a count.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use tonearm_common::{Error, Result, SongId};

use crate::models::{PlayCount, Song};

const SONG_COLUMNS: &str =
    "id, title, album, file_path, duration_secs, play_count, created_at";

fn parse_song_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<SongId> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_song(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: parse_song_id(row, 0)?,
        title: row.get(1)?,
        album: row.get(2)?,
        file_path: row.get(3)?,
        duration_secs: row.get(4)?,
        play_count: row.get(5)?,
        created_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(6)?)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Register a new song pointing at `file_path`, with a play count of zero.
pub fn create_song(
    conn: &Connection,
    title: &str,
    album: Option<&str>,
    file_path: &str,
    duration_secs: Option<i64>,
) -> Result<Song> {
    if title.trim().is_empty() {
        return Err(Error::invalid_input("song title cannot be empty"));
    }

    let id = SongId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO songs (id, title, album, file_path, duration_secs, play_count, created_at)
         VALUES (?, ?, ?, ?, ?, 0, ?)",
        params![
            id.to_string(),
            title,
            album,
            file_path,
            duration_secs,
            now.to_rfc3339(),
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Song {
        id,
        title: title.to_string(),
        album: album.map(str::to_string),
        file_path: file_path.to_string(),
        duration_secs,
        play_count: 0,
        created_at: now,
    })
}

/// Get a song by ID.
pub fn get_song(conn: &Connection, id: SongId) -> Result<Song> {
    conn.query_row(
        &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?"),
        [id.to_string()],
        row_to_song,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Error::not_found(format!("song {id}")),
        _ => Error::database(e.to_string()),
    })
}

/// List all songs, newest first.
pub fn list_songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SONG_COLUMNS} FROM songs ORDER BY created_at DESC, title ASC"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let songs = stmt
        .query_map([], row_to_song)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(songs)
}

/// Add one to a song's play count.
///
/// Returns `NotFound` when no song has this ID.
pub fn increment_play_count(conn: &Connection, id: SongId) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE songs SET play_count = play_count + 1 WHERE id = ?",
            [id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if updated == 0 {
        return Err(Error::not_found(format!("song {id}")));
    }

    Ok(())
}

/// Get the play count of a single song.
pub fn get_play_count(conn: &Connection, id: SongId) -> Result<i64> {
    conn.query_row(
        "SELECT play_count FROM songs WHERE id = ?",
        [id.to_string()],
        |row| row.get(0),
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Error::not_found(format!("song {id}")),
        _ => Error::database(e.to_string()),
    })
}

/// Get play counts for several songs at once.
///
/// Unknown IDs are skipped. Results follow the order of `ids`, with
/// duplicates collapsed to their first occurrence.
pub fn get_play_counts(conn: &Connection, ids: &[SongId]) -> Result<Vec<PlayCount>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, play_count FROM songs WHERE id IN ({placeholders})");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let found: HashMap<SongId, i64> = stmt
        .query_map(params_from_iter(ids.iter().map(|id| id.to_string())), |row| {
            Ok((parse_song_id(row, 0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<_>>()
        .map_err(|e| Error::database(e.to_string()))?;

    let mut seen = std::collections::HashSet::new();
    Ok(ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| {
            found.get(id).map(|&play_count| PlayCount {
                id: *id,
                play_count,
            })
        })
        .collect())
}
