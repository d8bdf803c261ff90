//! Benchmarks for parameter smoothing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use noisebox::dsp::{Ramp, SmoothedParam};

use crate::BLOCK_SIZES;

pub fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smoothing");

    for &size in BLOCK_SIZES {
        let mut param = SmoothedParam::new(0.0, 48_000.0);
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                param.set_target(if flip { 1.0 } else { 0.0 }, Ramp::Linear { seconds: 0.1 });
                for _ in 0..size {
                    black_box(param.next_value());
                }
            })
        });

        let mut param = SmoothedParam::new(0.0, 48_000.0);
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                let target = if flip { 1.0 } else { 0.0 };
                param.set_target(target, Ramp::Exponential { time_constant: 0.1 });
                for _ in 0..size {
                    black_box(param.next_value());
                }
            })
        });
    }

    group.finish();
}
