//! Encode/decode throughput.
//!
//! Run with: `cargo bench --bench codec`

mod common;

use std::hint::black_box;

use common::workload::{Workload, WorkloadSpec};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use topkit::codec;
use topkit::store::{ArrayTopK, ListTopK};
use topkit::traits::{ReadOnlyTopK, TopK};

const SEED: u64 = 7;
const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn filled_table(maxsize: usize) -> ArrayTopK {
    let keys = WorkloadSpec {
        universe: (maxsize * 4) as u64,
        workload: Workload::Exponential { lambda: 2.0 / maxsize as f64 },
        seed: SEED,
    }
    .keys(maxsize * 20);
    let mut table = ArrayTopK::with_seed(SEED);
    for key in &keys {
        table.increment(key, maxsize).unwrap();
    }
    table
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for maxsize in SIZES {
        let table = filled_table(maxsize);
        let ordered = table.encode();
        let legacy = codec::encode_legacy(table.iter().collect::<Vec<_>>());
        group.throughput(Throughput::Bytes(ordered.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", maxsize), &table, |b, t| {
            b.iter(|| black_box(t.encode()));
        });

        group.bench_with_input(BenchmarkId::new("decode_ordered", maxsize), &ordered, |b, bytes| {
            b.iter(|| black_box(codec::decode(bytes).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("decode_legacy", maxsize), &legacy, |b, bytes| {
            b.iter(|| black_box(codec::decode(bytes).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("load_list", maxsize), &ordered, |b, bytes| {
            let mut list = ListTopK::new();
            b.iter(|| {
                list.decode(bytes).unwrap();
                black_box(list.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
