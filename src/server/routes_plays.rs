//! Play count read-out.
//!
//! - `GET /api/plays/{song_id}` - Play count for one song
//! - `GET /api/plays?ids=<uuid>,<uuid>` - Play counts for several songs

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tonearm_common::{Error, SongId};
use tonearm_db::models::PlayCount;
use tonearm_db::pool::get_conn;
use tonearm_db::queries::songs;

use super::error::ApiError;
use super::AppContext;

#[derive(Debug, Default, Deserialize)]
pub struct PlaysQuery {
    /// Comma-separated song IDs.
    pub ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaysResponse {
    pub results: Vec<PlayCount>,
}

pub fn plays_routes() -> Router<AppContext> {
    Router::new()
        .route("/plays", get(get_play_counts))
        .route("/plays/:song_id", get(get_play_count))
}

/// Split an `ids` parameter into song IDs, dropping anything that does not parse.
fn parse_ids(raw: &str) -> Vec<SongId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

async fn get_play_count(
    State(ctx): State<AppContext>,
    Path(song_id): Path<String>,
) -> Result<Json<PlayCount>, ApiError> {
    let id: SongId = song_id
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid song id: {song_id}")))?;

    let pool = ctx.db_pool.clone();
    let play_count = tokio::task::spawn_blocking(move || {
        let conn = get_conn(&pool)?;
        songs::get_play_count(&conn, id)
    })
    .await
    .map_err(|e| Error::internal(e.to_string()))??;

    Ok(Json(PlayCount { id, play_count }))
}

async fn get_play_counts(
    State(ctx): State<AppContext>,
    Query(query): Query<PlaysQuery>,
) -> Result<Json<PlaysResponse>, ApiError> {
    let ids = query.ids.as_deref().map(parse_ids).unwrap_or_default();
    if ids.is_empty() {
        return Ok(Json(PlaysResponse { results: Vec::new() }));
    }

    let pool = ctx.db_pool.clone();
    let results = tokio::task::spawn_blocking(move || {
        let conn = get_conn(&pool)?;
        songs::get_play_counts(&conn, &ids)
    })
    .await
    .map_err(|e| Error::internal(e.to_string()))??;

    Ok(Json(PlaysResponse { results }))
}
