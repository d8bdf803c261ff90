#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    graph::{DEFAULT_CUTOFF_HZ, DEFAULT_Q},
    noise::NoiseColor,
};

pub const MIN_VOLUME: f32 = 0.0;
pub const MAX_VOLUME: f32 = 1.0;
pub const MIN_FREQUENCY_HZ: f32 = 20.0;
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;
pub const MIN_Q: f32 = 0.01;
pub const MAX_Q: f32 = 40.0;

/// What the listener wants to hear, as pushed by the UI (or a preset).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioState {
    pub is_playing: bool,
    /// Linear gain, 0.0 ..= 1.0.
    pub volume: f32,
    pub noise_color: NoiseColor,
    /// Lowpass cutoff in Hz, 20 ..= 20000.
    pub filter_frequency: f32,
    /// Lowpass resonance, strictly positive.
    pub filter_q: f32,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: 0.5,
            noise_color: NoiseColor::Pink,
            filter_frequency: DEFAULT_CUTOFF_HZ,
            filter_q: DEFAULT_Q,
        }
    }
}

impl AudioState {
    pub fn playing(mut self, is_playing: bool) -> Self {
        self.is_playing = is_playing;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_color(mut self, color: NoiseColor) -> Self {
        self.noise_color = color;
        self
    }

    pub fn with_filter(mut self, frequency: f32, q: f32) -> Self {
        self.filter_frequency = frequency;
        self.filter_q = q;
        self
    }

    /// Report the first field outside its domain.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("volume", self.volume, MIN_VOLUME, MAX_VOLUME),
            (
                "filter_frequency",
                self.filter_frequency,
                MIN_FREQUENCY_HZ,
                MAX_FREQUENCY_HZ,
            ),
            ("filter_q", self.filter_q, MIN_Q, MAX_Q),
        ];

        for (name, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(EngineError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Copy with every continuous field forced into its domain.
    ///
    /// NaN has no nearest bound, so it falls back to a neutral value: silence
    /// for volume, the default cutoff and resonance for the filter.
    pub fn clamped(&self) -> Self {
        Self {
            is_playing: self.is_playing,
            volume: clamp_or(self.volume, MIN_VOLUME, MAX_VOLUME, MIN_VOLUME),
            noise_color: self.noise_color,
            filter_frequency: clamp_or(
                self.filter_frequency,
                MIN_FREQUENCY_HZ,
                MAX_FREQUENCY_HZ,
                DEFAULT_CUTOFF_HZ,
            ),
            filter_q: clamp_or(self.filter_q, MIN_Q, MAX_Q, DEFAULT_Q),
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, nan_fallback: f32) -> f32 {
    if value.is_nan() {
        nan_fallback
    } else {
        value.clamp(min, max)
    }
}
