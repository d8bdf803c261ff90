//! Engine-wide tunables.
//!
//! The fade window and smoothing time constant were tuned by ear; nothing
//! physical pins them, so they live here instead of in the graph code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_TIME;

/// Seed used for every noise color unless overridden.
pub const DEFAULT_SEED: u64 = 0x6E6F_6973_6562_6F78;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Start/stop fade window in seconds.
    pub fade_seconds: f32,
    /// Time constant (seconds) for volume/cutoff/resonance smoothing.
    pub smoothing_time_constant: f32,
    /// Length of each looping noise buffer in seconds.
    pub buffer_seconds: f32,
    /// Length of the tail-into-head crossfade at the loop seam.
    pub loop_crossfade_seconds: f32,
    /// Seed for the pseudo-random stream feeding all colors.
    pub seed: u64,
    /// Analyzer window length (power of two). Bin count is half of this.
    pub fft_size: usize,
    /// Blend factor between the previous and the new magnitude (0..1).
    pub spectrum_smoothing: f32,
    /// Magnitude mapped to 0 in a spectrum frame.
    pub min_decibels: f32,
    /// Magnitude mapped to 255 in a spectrum frame.
    pub max_decibels: f32,
    /// Slots in the control -> audio command ring.
    pub command_capacity: usize,
    /// Capacity of the audio -> analyzer ring, in multiples of `fft_size`.
    pub analyzer_capacity_blocks: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_seconds: 0.1,
            smoothing_time_constant: 0.1,
            buffer_seconds: 5.0,
            loop_crossfade_seconds: 0.05,
            seed: DEFAULT_SEED,
            fft_size: 2048,
            spectrum_smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            command_capacity: 256,
            analyzer_capacity_blocks: 8,
        }
    }
}

impl EngineConfig {
    pub fn with_fade_seconds(mut self, seconds: f32) -> Self {
        self.fade_seconds = seconds;
        self
    }

    pub fn with_smoothing_time_constant(mut self, seconds: f32) -> Self {
        self.smoothing_time_constant = seconds;
        self
    }

    pub fn with_buffer_seconds(mut self, seconds: f32) -> Self {
        self.buffer_seconds = seconds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Number of magnitude bins a spectrum frame carries.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Repair values that would break the engine rather than reject them.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.fade_seconds = finite_or(self.fade_seconds, defaults.fade_seconds).max(MIN_TIME);
        self.smoothing_time_constant =
            finite_or(self.smoothing_time_constant, defaults.smoothing_time_constant)
                .max(MIN_TIME);
        self.buffer_seconds = finite_or(self.buffer_seconds, defaults.buffer_seconds).max(0.1);
        self.loop_crossfade_seconds =
            finite_or(self.loop_crossfade_seconds, defaults.loop_crossfade_seconds).max(0.0);

        self.fft_size = self.fft_size.clamp(32, 32_768).next_power_of_two();
        self.spectrum_smoothing =
            finite_or(self.spectrum_smoothing, defaults.spectrum_smoothing).clamp(0.0, 0.999);

        let min_db = finite_or(self.min_decibels, defaults.min_decibels);
        let max_db = finite_or(self.max_decibels, defaults.max_decibels);
        if min_db < max_db {
            self.min_decibels = min_db;
            self.max_decibels = max_db;
        } else {
            self.min_decibels = defaults.min_decibels;
            self.max_decibels = defaults.max_decibels;
        }

        self.command_capacity = self.command_capacity.max(8);
        self.analyzer_capacity_blocks = self.analyzer_capacity_blocks.max(1);
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let config = EngineConfig::default();
        assert_eq!(config.fade_seconds, 0.1);
        assert_eq!(config.smoothing_time_constant, 0.1);
        assert_eq!(config.buffer_seconds, 5.0);
        assert_eq!(config.bin_count(), 1024);
    }

    #[test]
    fn sanitized_rounds_fft_size_up() {
        let config = EngineConfig::default().with_fft_size(1000).sanitized();
        assert_eq!(config.fft_size, 1024);
    }

    #[test]
    fn sanitized_repairs_durations_and_decibels() {
        let mut config = EngineConfig::default()
            .with_fade_seconds(-1.0)
            .with_smoothing_time_constant(f32::NAN);
        config.min_decibels = -10.0;
        config.max_decibels = -20.0;

        let config = config.sanitized();
        assert!(config.fade_seconds > 0.0);
        assert_eq!(config.smoothing_time_constant, 0.1);
        assert!(config.min_decibels < config.max_decibels);
    }
}
