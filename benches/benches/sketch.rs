// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the sketch and the heavy-hitters tracker.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use repaint_sketch::{CountMinSketch, HotSet};

fn bench_sketch(c: &mut Criterion) {
    let mut group = c.benchmark_group("repaint_sketch");
    group.sample_size(50);

    for &k in &[4_usize, 16, 64] {
        group.bench_function(format!("increment(k={k})"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(0x5EED);
                    CountMinSketch::with_rng(k, 0.01, &mut rng).unwrap()
                },
                |mut sketch| {
                    for key in 0..1_000_u64 {
                        sketch.increment(key % 37);
                    }
                    black_box(sketch);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("estimate(k={k})"), |b| {
            let mut rng = StdRng::seed_from_u64(0x5EED);
            let mut sketch = CountMinSketch::with_rng(k, 0.01, &mut rng).unwrap();
            for key in 0..10_000_u64 {
                sketch.increment(key % 37);
            }
            b.iter(|| {
                let mut total = 0_u64;
                for key in 0..37_u64 {
                    total += sketch.estimate(key);
                }
                black_box(total)
            });
        });
    }

    for &keys in &[8_u64, 128] {
        group.bench_function(format!("observe(keys={keys})"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(1);
                    HotSet::<u64>::with_rng(8, 0.01, 0.1, &mut rng).unwrap()
                },
                |mut hot| {
                    for i in 0..1_000_u64 {
                        hot.observe(i % keys);
                    }
                    black_box(hot.len())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sketch);
criterion_main!(benches);
