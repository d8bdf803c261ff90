//! Benchmarks for whole-engine scenarios.

mod buffers;
mod graph;

pub use buffers::bench_buffers;
pub use graph::bench_graph;
