//! Precomputed, loopable noise buffers.
//!
//! The shaping math lives in [`crate::dsp::noise`]; this module turns it into
//! fixed buffers that the graph can loop without doing any synthesis work on
//! the audio thread.

mod buffer;
mod factory;

use std::sync::Arc;

pub use crate::dsp::noise::NoiseColor;
pub use buffer::NoiseBuffer;
pub use factory::NoiseBufferFactory;

use crate::error::Result;

/// One buffer per color, held for the engine's lifetime.
#[derive(Debug, Clone)]
pub struct NoiseBank {
    white: Arc<NoiseBuffer>,
    pink: Arc<NoiseBuffer>,
    brown: Arc<NoiseBuffer>,
}

impl NoiseBank {
    pub fn generate(factory: &NoiseBufferFactory, sample_rate: u32) -> Result<Self> {
        Ok(Self {
            white: Arc::new(factory.generate(NoiseColor::White, sample_rate)?),
            pink: Arc::new(factory.generate(NoiseColor::Pink, sample_rate)?),
            brown: Arc::new(factory.generate(NoiseColor::Brown, sample_rate)?),
        })
    }

    /// Shared handle to the buffer for `color`.
    pub fn get(&self, color: NoiseColor) -> Arc<NoiseBuffer> {
        match color {
            NoiseColor::White => Arc::clone(&self.white),
            NoiseColor::Pink => Arc::clone(&self.pink),
            NoiseColor::Brown => Arc::clone(&self.brown),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.white.sample_rate()
    }
}
