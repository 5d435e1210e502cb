//! Throughput benchmarks for the DEFLATE codec.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use streampack_deflate::{deflate, inflate};

fn text_like(size: usize) -> Vec<u8> {
    let text: &[u8] = b"The quick brown fox jumps over the lazy dog. \
                        Pack my box with five dozen liquor jugs. ";
    text.iter().copied().cycle().take(size).collect()
}

fn bench_deflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("deflate");
    for size in [16 * 1024, 64 * 1024] {
        let data = text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| deflate(black_box(data)).unwrap());
        });
    }
    group.finish();
}

fn bench_inflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("inflate");
    for size in [16 * 1024, 64 * 1024] {
        let compressed = deflate(&text_like(size)).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &compressed,
            |b, compressed| {
                b.iter(|| inflate(black_box(compressed)).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_deflate, bench_inflate);
criterion_main!(benches);
