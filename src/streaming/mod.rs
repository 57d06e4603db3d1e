//! Song streaming.
//!
//! Serves stored audio over plain HTTP with byte-range support so players can
//! seek. A request flows through three stages:
//!
//! - [`range`] turns the `Range` header and the asset size into a [`DeliveryPlan`]
//! - [`transmit`] copies exactly the planned bytes into the response body in
//!   bounded chunks, stopping quietly when the client goes away
//! - [`accounting`] bumps the song's play count when the plan starts at byte zero
//!
//! # Routes
//!
//! - `GET /api/songs/{song_id}/stream` - Stream a song with range support
//! - `HEAD /api/songs/{song_id}/stream` - Headers only, no play is counted

pub mod accounting;
pub mod asset;
mod direct;
pub mod error;
pub mod range;
pub mod transmit;

pub use accounting::{record_playback, should_count, PlayCounter, SqlitePlayCounter};
pub use asset::{AssetHandle, AssetSource, AssetStore, CatalogStore};
pub use direct::stream_song;
pub use error::StreamError;
pub use range::{negotiate, parse_range, ByteRange, DeliveryPlan, RangeError, RangeSpec};
pub use transmit::{transmit, BodySender, ChunkSink, SinkClosed, TransmitOutcome};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create the song streaming router. `get` also answers `HEAD`.
pub fn song_router() -> Router<AppContext> {
    Router::new().route("/:song_id/stream", get(stream_song))
}
