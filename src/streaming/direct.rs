//! Direct song streaming with HTTP range requests.
//!
//! `GET /api/songs/{song_id}/stream` looks the song up, negotiates the range,
//! then hands the asset to a transmitter task that feeds the response body
//! chunk by chunk. A plan starting at byte zero also spawns the play count
//! increment; the response never waits on it.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::Response,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonearm_common::SongId;

use super::accounting::{record_playback, should_count};
use super::error::StreamError;
use super::range::{negotiate, DeliveryPlan};
use super::transmit::{transmit, BodySender, ChunkSink, TransmitOutcome};
use crate::server::AppContext;

/// Chunks buffered between the transmitter and the HTTP body.
const BODY_CHANNEL_DEPTH: usize = 4;

/// Stream a song with range request support.
pub async fn stream_song(
    State(ctx): State<AppContext>,
    Path(song_id): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, StreamError> {
    let song_id: SongId = song_id
        .parse()
        .map_err(|_| StreamError::InvalidId(song_id.clone()))?;

    let asset = ctx.assets.lookup(song_id).await?;
    let total_size = asset.total_size();

    // A header that is not visible ASCII cannot match the grammar.
    let range_header = headers
        .get(header::RANGE)
        .map(|value| value.to_str().unwrap_or_default());

    let plan = negotiate(range_header, total_size);

    if let DeliveryPlan::Unsatisfiable { reason, .. } = &plan {
        tracing::debug!(%song_id, total_size, %reason, "Range not satisfiable");
        drop(asset);
        return unsatisfiable_response(&plan);
    }

    let content_type = asset
        .content_type()
        .unwrap_or(ctx.config.streaming.default_content_type.as_str())
        .to_string();

    let mut builder = Response::builder()
        .status(plan.status())
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, plan.content_length())
        .header(header::ACCEPT_RANGES, "bytes");

    if let Some(content_range) = plan.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    if method == Method::HEAD {
        drop(asset);
        return builder
            .body(Body::empty())
            .map_err(|e| StreamError::Internal(e.to_string()));
    }

    tracing::debug!(
        %song_id,
        status = plan.status().as_u16(),
        start = ?plan.start(),
        content_length = plan.content_length(),
        "Streaming song"
    );

    if should_count(&plan) {
        let plays = ctx.plays.clone();
        let accounted = plan.clone();
        tokio::spawn(async move {
            record_playback(plays.as_ref(), song_id, &accounted).await;
        });
    }

    let (tx, rx) = mpsc::channel(BODY_CHANNEL_DEPTH);
    let chunk_size = ctx.config.streaming.chunk_size();
    tokio::spawn(run_transmission(asset, plan, chunk_size, tx));

    builder
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .map_err(|e| StreamError::Internal(e.to_string()))
}

async fn run_transmission(
    asset: super::asset::AssetHandle,
    plan: DeliveryPlan,
    chunk_size: std::num::NonZeroUsize,
    mut tx: BodySender,
) {
    let song_id = asset.song_id();

    match transmit(asset, &plan, chunk_size, &mut tx).await {
        Ok(TransmitOutcome::Completed { bytes_sent }) => {
            tracing::debug!(%song_id, bytes_sent, "Stream complete");
        }
        Ok(TransmitOutcome::ClientDisconnected { bytes_sent }) => {
            tracing::debug!(%song_id, bytes_sent, "Stream ended by client");
        }
        Err(e) => {
            // Headers are already committed; all that is left is to cut the body short.
            tracing::error!(%song_id, error = %e, "Stream aborted");
            tx.abort(std::io::Error::other(e.to_string())).await;
        }
    }
}

fn unsatisfiable_response(plan: &DeliveryPlan) -> Result<Response, StreamError> {
    let mut builder = Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(header::ACCEPT_RANGES, "bytes");

    if let Some(content_range) = plan.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    builder
        .body(Body::empty())
        .map_err(|e| StreamError::Internal(e.to_string()))
}
