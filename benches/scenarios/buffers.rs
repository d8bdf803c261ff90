//! Benchmarks for looping buffer generation (runs once per engine start).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use noisebox::{NoiseBufferFactory, NoiseColor};

pub fn bench_buffers(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/buffers");
    group.sample_size(10);

    let factory = NoiseBufferFactory::default();
    for color in NoiseColor::ALL {
        group.bench_with_input(BenchmarkId::new(color.name(), 48_000), &color, |b, &color| {
            b.iter(|| factory.generate(black_box(color), 48_000))
        });
    }

    group.finish();
}
