pub mod config;
pub mod control; // AudioState and the transition policy
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph; // Fixed source -> filter -> gain -> analyzer chain
pub mod noise; // Looping noise buffers per color
pub mod spectrum;

pub use config::EngineConfig;
pub use control::{AudioState, Transition, TransitionController};
pub use engine::{GraphRenderer, NoiseEngine};
pub use error::{EngineError, Result};
pub use graph::{SignalGraph, TransportState};
pub use noise::{NoiseBank, NoiseBuffer, NoiseBufferFactory, NoiseColor};
pub use spectrum::{SpectrumFrame, SpectrumSampler};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
