// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-frame benchmarks over generated scenes.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;
use repaint_planner::Planner;
use repaint_scene::{Node, NodeId, NodeKind, SceneGraph};
use repaint_sketch::HotSet;

/// Builds a scene of `n` nodes: widgets with `fanout` children each, text
/// leaves at the bottom.
fn build_scene(n: u32, fanout: u32) -> SceneGraph {
    let mut scene = SceneGraph::new();
    for id in 1..=n {
        let parent = if id <= fanout { 0 } else { (id - 1) / fanout };
        let kind = if id * fanout > n {
            NodeKind::text("leaf")
        } else {
            NodeKind::Widget
        };
        scene
            .add(NodeId::new(parent), NodeId::new(id), kind)
            .expect("generated ids are fresh");
    }
    scene
}

fn noop(_: &Node) {}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("repaint_frame");
    group.sample_size(30);

    for &(n, fanout) in &[(256_u32, 4_u32), (4_096, 4), (4_096, 16)] {
        // Steady state: a handful of hot leaves updated every frame.
        group.bench_function(format!("hot_leaves(n={n},f={fanout})"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(7);
                    let mut scene = build_scene(n, fanout);
                    let mut hot =
                        HotSet::<NodeId>::with_rng(4, 0.01, 0.1, &mut rng).unwrap();
                    let mut planner = Planner::new();
                    // Warm-up frame to populate the cache.
                    planner.run_frame(&mut scene, |id| hot.contains(id), &mut noop);
                    let targets: Vec<NodeId> =
                        (0..4).map(|_| NodeId::new(rng.gen_range(n / 2..=n))).collect();
                    (scene, hot, planner, targets)
                },
                |(mut scene, mut hot, mut planner, targets)| {
                    for _ in 0..10 {
                        for &target in &targets {
                            if !scene.get(target).unwrap().is_dirty() {
                                hot.observe(target);
                            }
                            scene.update(target, &["x".into()]).unwrap();
                        }
                        let report =
                            planner.run_frame(&mut scene, |id| hot.contains(id), &mut noop);
                        black_box(report.rendered.len());
                    }
                },
                BatchSize::SmallInput,
            );
        });

        // Fully idle frames: the no-op fast path.
        group.bench_function(format!("idle(n={n},f={fanout})"), |b| {
            let mut scene = build_scene(n, fanout);
            let mut planner = Planner::new();
            planner.run_frame(&mut scene, |_| false, &mut noop);
            b.iter(|| {
                let report = planner.run_frame(&mut scene, |_| false, &mut noop);
                black_box(report.is_idle())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
