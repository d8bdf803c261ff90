//! Benchmarks for the noise generators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use noisebox::dsp::noise::NoiseGenerator;
use noisebox::NoiseColor;

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for color in NoiseColor::ALL {
            let mut generator = NoiseGenerator::new(color, 7);
            group.bench_with_input(BenchmarkId::new(color.name(), size), &size, |b, _| {
                b.iter(|| generator.fill(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
