//! Encode and decode throughput with a cheap KDF, so the AEAD and framing dominate.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cyphro_core::codec::FileCodec;
use cyphro_core::config::{CodecConfig, CodecPolicy};
use cyphro_core::crypto::derive_keys;
use cyphro_core::types::TransferableFile;

const PASSWORD: &str = "benchmark-password";
const KDF_ITERATIONS: u32 = 1_000;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

fn format_size(bytes: usize) -> String {
    if bytes >= MB {
        format!("{} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KiB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

fn codec() -> FileCodec {
    FileCodec::new(
        CodecConfig::default()
            .with_iterations(KDF_ITERATIONS)
            .with_policy(CodecPolicy::permissive()),
    )
}

fn bench_encode(c: &mut Criterion) {
    let codec = codec();
    let mut group = c.benchmark_group("encode");

    for size in [KB, 64 * KB, MB] {
        let source = TransferableFile::new("bench.dat", "", vec![0x41u8; size]);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("size", format_size(size)), &source, |b, source| {
            b.iter(|| codec.encode(black_box(source), PASSWORD, None).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let codec = codec();
    let mut group = c.benchmark_group("decode");

    for size in [KB, 64 * KB, MB] {
        let source = TransferableFile::new("bench.dat", "", vec![0x41u8; size]);
        let enc = codec.encode(&source, PASSWORD, None).unwrap();
        let container = TransferableFile::new(enc.file_name, "", enc.data);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("size", format_size(size)), &container, |b, container| {
            b.iter(|| codec.decode(black_box(container), PASSWORD).unwrap())
        });
    }
    group.finish();
}

fn bench_kdf(c: &mut Criterion) {
    let salt = [7u8; 16];
    let mut group = c.benchmark_group("kdf");
    group.sample_size(10);

    for iterations in [1_000u32, 100_000] {
        group.bench_with_input(BenchmarkId::new("pbkdf2", iterations), &iterations, |b, &n| {
            b.iter(|| derive_keys(black_box(PASSWORD), &salt, n).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_kdf);
criterion_main!(benches);
