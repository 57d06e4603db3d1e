//! Benchmarks for streaming performance.
//!
//! Measures range negotiation cost and chunked transmission throughput.

use async_trait::async_trait;
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io::Cursor;
use std::num::NonZeroUsize;
use tonearm::streaming::{negotiate, transmit, AssetHandle, ChunkSink, SinkClosed};
use tonearm_common::SongId;

/// Sink that discards chunks.
struct NullSink {
    bytes: u64,
}

#[async_trait]
impl ChunkSink for NullSink {
    async fn send_chunk(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
        self.bytes += chunk.len() as u64;
        Ok(())
    }
}

fn bench_negotiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("negotiate");

    let headers = [
        ("none", None),
        ("open_ended", Some("bytes=1048576-")),
        ("closed", Some("bytes=0-65535")),
        ("malformed", Some("bytes=-500")),
        ("out_of_bounds", Some("bytes=999999999-")),
    ];

    for (name, header) in headers {
        group.bench_function(name, |b| {
            b.iter(|| black_box(negotiate(black_box(header), black_box(8 * 1024 * 1024))))
        });
    }

    group.finish();
}

fn bench_transmit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("transmit");

    let asset_size = 4 * 1024 * 1024;
    let data = vec![0u8; asset_size];
    let plan = negotiate(None, asset_size as u64);

    group.throughput(Throughput::Bytes(asset_size as u64));

    for chunk_size in [16 * 1024, 64 * 1024, 256 * 1024] {
        let chunk_size = NonZeroUsize::new(chunk_size).unwrap();

        group.bench_function(format!("chunk_{}", chunk_size), |b| {
            b.iter(|| {
                rt.block_on(async {
                    let asset = AssetHandle::new(
                        SongId::new(),
                        asset_size as u64,
                        Cursor::new(data.clone()),
                    );
                    let mut sink = NullSink { bytes: 0 };
                    let outcome = transmit(asset, &plan, chunk_size, &mut sink).await.unwrap();
                    black_box((outcome, sink.bytes))
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_negotiate, bench_transmit);
criterion_main!(benches);
