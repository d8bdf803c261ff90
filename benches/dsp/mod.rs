//! Benchmarks for low-level DSP primitives.

mod filter;
mod noise;
mod smoothing;

pub use filter::bench_filter;
pub use noise::bench_noise;
pub use smoothing::bench_smoothing;
