//! Benchmarks for full graph blocks as rendered by the device callback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use noisebox::{AudioState, EngineConfig, NoiseColor, NoiseEngine};

use crate::BLOCK_SIZES;

pub fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/graph");
    let config = EngineConfig::default().with_buffer_seconds(1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === STEADY STATE ===
        // pink noise, filter partly closed, nothing moving
        let Ok((mut engine, mut renderer)) = NoiseEngine::offline(config.clone(), 48_000) else {
            return;
        };
        let _ = engine.set_state(
            AudioState::default()
                .playing(true)
                .with_color(NoiseColor::Pink)
                .with_filter(2_000.0, 0.707),
        );
        let mut warmup = vec![0.0f32; 48_000];
        renderer.render(&mut warmup);

        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| renderer.render(black_box(&mut buffer)))
        });

        // === SWEEPING ===
        // filter target moving every block: per-sample coefficient updates
        let Ok((mut engine, mut renderer)) = NoiseEngine::offline(config.clone(), 48_000) else {
            return;
        };
        let mut state = AudioState::default().playing(true);
        let _ = engine.set_state(state);
        let mut flip = false;

        group.bench_with_input(BenchmarkId::new("sweeping", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                state.filter_frequency = if flip { 300.0 } else { 12_000.0 };
                let _ = engine.set_state(state);
                renderer.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
