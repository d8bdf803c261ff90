//! Benchmarks for the state-variable lowpass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use noisebox::dsp::filter::SVFilter;
use noisebox::graph::{FilterNode, GraphNode, RenderCtx};
use noisebox::dsp::Ramp;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Fixed coefficients
        let mut filter = SVFilter::lowpass(1000.0, 0.707);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Cutoff sweeping every sample: coefficients recomputed per sample
        let mut node = FilterNode::lowpass(20_000.0, 1.0, ctx.sample_rate);
        let mut buffer = input.clone();
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("smoothed_sweep", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                let cutoff = if flip { 200.0 } else { 20_000.0 };
                node.set_target(cutoff, 4.0, Ramp::Exponential { time_constant: 0.1 });
                buffer.copy_from_slice(&input);
                node.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
