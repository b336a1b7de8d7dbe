//! Response parser benchmarks
//!
//! Run with: cargo bench --bench parse

use courier::http::parse_response;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn build_response(header_count: usize, body_len: usize) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(b"HTTP/1.1 200 OK\r\n");
    for i in 0..header_count {
        raw.extend_from_slice(format!("X-Header-{}: value-{}\r\n", i, i).as_bytes());
    }
    raw.extend_from_slice(b"\r\n");
    raw.extend(std::iter::repeat(b'x').take(body_len));
    raw
}

fn bench_parse_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_plain");

    for (name, headers, body) in [("small", 4, 128), ("medium", 16, 4096), ("large", 32, 65536)] {
        let raw = build_response(headers, body);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| black_box(parse_response(black_box(&raw))));
        });
    }

    group.finish();
}

fn bench_parse_with_continuations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_continuations");

    let mut raw = Vec::new();
    for _ in 0..3 {
        raw.extend_from_slice(b"HTTP/1.1 100 Continue\r\n\r\n");
    }
    raw.extend_from_slice(&build_response(16, 4096));

    group.throughput(Throughput::Bytes(raw.len() as u64));
    group.bench_function("three_preambles", |b| {
        b.iter(|| black_box(parse_response(black_box(&raw))));
    });

    group.finish();
}

fn bench_parse_malformed(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_malformed");

    let raw = vec![b'j'; 4096];
    group.bench_function("no_boundary_4k", |b| {
        b.iter(|| black_box(parse_response(black_box(&raw))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_plain,
    bench_parse_with_continuations,
    bench_parse_malformed
);
criterion_main!(benches);
