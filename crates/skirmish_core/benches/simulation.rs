//! Simulation benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skirmish_core::prelude::*;
use skirmish_test_utils::fixtures;

fn skirmish_with_armies(per_side: usize) -> Match {
    let mut sim = fixtures::two_base_match();
    for i in 0..per_side {
        let offset = (i % 10) as f32 * 20.0;
        sim.spawn_unit(
            fixtures::RIFLEMAN,
            Faction::Player,
            Vec2::new(400.0 + offset, 400.0 + (i / 10) as f32 * 20.0),
        );
        sim.spawn_unit(
            fixtures::RIFLEMAN,
            Faction::Enemy,
            Vec2::new(1400.0 + offset, 1400.0 + (i / 10) as f32 * 20.0),
        );
    }
    sim
}

/// One full tick with mid-sized armies in contact.
pub fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("tick_50v50", |b| {
        let mut sim = skirmish_with_armies(50);
        let mut commander = NullCommander;
        b.iter(|| {
            black_box(sim.tick(&mut commander));
        });
    });
}

/// Snapshot capture and wholesale client rebuild.
pub fn snapshot_benchmark(c: &mut Criterion) {
    c.bench_function("snapshot_roundtrip_100v100", |b| {
        let server = skirmish_with_armies(100);
        let mut client = fixtures::empty_match();
        b.iter(|| {
            let snapshot = server.capture_snapshot();
            client.apply_snapshot(black_box(&snapshot));
        });
    });
}

criterion_group!(benches, tick_benchmark, snapshot_benchmark);
criterion_main!(benches);
