//! Chunked transmission of a negotiated byte window.
//!
//! The transmitter seeks once to the start of the window and then reads at
//! most `chunk_size` bytes at a time, handing each chunk to a [`ChunkSink`]
//! as soon as it is read. The window length is the hard upper bound: bytes
//! after the plan's end are never read, whatever the asset holds.

use std::io::{self, SeekFrom};
use std::num::NonZeroUsize;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;

use super::asset::AssetHandle;
use super::error::StreamError;
use super::range::DeliveryPlan;

/// The receiving side went away; nothing more can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Destination for streamed chunks.
#[async_trait]
pub trait ChunkSink: Send {
    async fn send_chunk(&mut self, chunk: Bytes) -> Result<(), SinkClosed>;

    /// Tell the receiver the body will not complete. Best effort.
    async fn abort(&mut self, _error: io::Error) {}
}

/// Channel feeding an HTTP response body.
pub type BodySender = mpsc::Sender<Result<Bytes, io::Error>>;

#[async_trait]
impl ChunkSink for BodySender {
    async fn send_chunk(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
        self.send(Ok(chunk)).await.map_err(|_| SinkClosed)
    }

    async fn abort(&mut self, error: io::Error) {
        let _ = self.send(Err(error)).await;
    }
}

/// How a transmission ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitOutcome {
    /// The whole window was delivered.
    Completed { bytes_sent: u64 },
    /// The sink closed before the window was exhausted.
    ClientDisconnected { bytes_sent: u64 },
}

impl TransmitOutcome {
    pub fn bytes_sent(&self) -> u64 {
        match *self {
            Self::Completed { bytes_sent } | Self::ClientDisconnected { bytes_sent } => bytes_sent,
        }
    }
}

/// Stream the plan's byte window from `asset` into `sink`.
///
/// The asset is taken by value and dropped when this returns, on success,
/// disconnect, or error alike. A read error, or the asset ending before the
/// window is exhausted, is `StreamError::AssetRead`.
pub async fn transmit<S>(
    mut asset: AssetHandle,
    plan: &DeliveryPlan,
    chunk_size: NonZeroUsize,
    sink: &mut S,
) -> Result<TransmitOutcome, StreamError>
where
    S: ChunkSink + ?Sized,
{
    let song_id = asset.song_id();

    let Some((offset, length)) = plan.span() else {
        return Ok(TransmitOutcome::Completed { bytes_sent: 0 });
    };

    if length == 0 {
        return Ok(TransmitOutcome::Completed { bytes_sent: 0 });
    }

    let source = asset.source_mut();
    source
        .seek(SeekFrom::Start(offset))
        .await
        .map_err(StreamError::AssetRead)?;

    let chunk_size = chunk_size.get() as u64;
    let mut remaining = length;
    let mut bytes_sent = 0u64;
    let mut buf = BytesMut::new();

    while remaining > 0 {
        let want = chunk_size.min(remaining);
        // Bounded by chunk_size, which is a usize.
        buf.reserve(want as usize);

        // `take` caps the read at the window even when `buf` has spare capacity.
        let n = match (&mut *source).take(want).read_buf(&mut buf).await {
            Ok(0) => {
                return Err(StreamError::AssetRead(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "asset ended with {} of {} bytes still to send",
                        remaining, length
                    ),
                )));
            }
            Ok(n) => n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::AssetRead(e)),
        };

        if sink.send_chunk(buf.split().freeze()).await.is_err() {
            tracing::debug!(%song_id, bytes_sent, remaining, "Client disconnected mid-stream");
            return Ok(TransmitOutcome::ClientDisconnected { bytes_sent });
        }

        bytes_sent += n;
        remaining -= n;
    }

    Ok(TransmitOutcome::Completed { bytes_sent })
}
