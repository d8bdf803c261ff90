//! Frequency-domain snapshots of whatever the graph is currently playing.
//!
//! The audio thread only ever pushes samples into the analyzer ring; all FFT
//! work happens here, on whichever thread owns the [`SpectrumSampler`].

/// Fixed-interval sampling thread.
pub mod cadence;

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::{config::EngineConfig, graph::AnalyzerFeed};

pub use cadence::{spawn_sampler, SamplerHandle};

/// Floor for magnitudes before the log; anything below maps to byte 0 anyway.
const MIN_MAGNITUDE: f32 = 1e-12;

/// One analyzer reading: `fft_size / 2` bytes, 0 at `min_decibels` and 255 at
/// `max_decibels`. Bin `k` is centred on `k * bin_hz`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumFrame {
    bins: Vec<u8>,
    bin_hz: f32,
}

impl SpectrumFrame {
    /// Frame returned before init and by an engine without audio output.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn zeroed(bin_count: usize, bin_hz: f32) -> Self {
        Self {
            bins: vec![0; bin_count],
            bin_hz,
        }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Width of one bin in Hz (0 for an empty frame).
    pub fn bin_hz(&self) -> f32 {
        self.bin_hz
    }

    /// Byte value of the bin closest to `hz`, if the frame covers it.
    pub fn level_at(&self, hz: f32) -> Option<u8> {
        if self.bin_hz <= 0.0 || !hz.is_finite() || hz < 0.0 {
            return None;
        }
        let index = (hz / self.bin_hz).round() as usize;
        self.bins.get(index).copied()
    }

    /// Index of the loudest bin.
    pub fn peak_bin(&self) -> Option<usize> {
        self.bins
            .iter()
            .enumerate()
            .max_by_key(|&(_, level)| *level)
            .map(|(index, _)| index)
    }
}

/*
Spectrum Pipeline
=================

Each pull:

  analyzer ring ──drain──▶ history (last fft_size samples, circular)
                              │
                              ▼ oldest first, times Hann window
                           forward FFT
                              │
                              ▼ |X[k]| / fft_size, k < fft_size / 2
                  smoothed[k] = s * smoothed[k] + (1 - s) * |X[k]|
                              │
                              ▼ 20 log10, mapped [min_db, max_db] -> 0..=255
                           SpectrumFrame

While stopped the graph keeps feeding silence through the tap, so the
window fills with zeros and the smoothing makes the last picture fade out
instead of vanishing.

If nobody pulled for long enough that the tap had to drop samples, what is
still queued is older than what was dropped. The queue and the history are
thrown away and the window restarts from silence.
*/

pub struct SpectrumSampler {
    feed: AnalyzerFeed,
    /// Tap drop count at the last pull.
    seen_drops: u64,
    history: Vec<f32>,
    write_pos: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    frame: SpectrumFrame,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
    sample_rate: f32,
}

impl SpectrumSampler {
    pub fn new(feed: impl Into<AnalyzerFeed>, sample_rate: f32, config: &EngineConfig) -> Self {
        let feed = feed.into();
        let config = config.clone().sanitized();
        let fft_size = config.fft_size;
        let bin_count = config.bin_count();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let fft_scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        // Hann window - reduces spectral leakage
        let window = (0..fft_size)
            .map(|i| {
                let denom = (fft_size - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
            })
            .collect();

        Self {
            seen_drops: feed.dropped(),
            feed,
            history: vec![0.0; fft_size],
            write_pos: 0,
            window,
            fft,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            fft_scratch,
            smoothed: vec![0.0; bin_count],
            frame: SpectrumFrame::zeroed(bin_count, sample_rate / fft_size as f32),
            smoothing: config.spectrum_smoothing,
            min_db: config.min_decibels,
            max_db: config.max_decibels,
            sample_rate,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Most recent frame without pulling a new one.
    pub fn last_frame(&self) -> &SpectrumFrame {
        &self.frame
    }

    fn drain(&mut self) {
        let dropped = self.feed.dropped();
        if dropped != self.seen_drops {
            self.seen_drops = dropped;
            self.feed.discard();
            self.history.fill(0.0);
            self.write_pos = 0;
            return;
        }

        let len = self.history.len();
        while let Some(sample) = self.feed.pop() {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % len;
        }
    }

    /// Take everything the graph produced since the last pull and compute a
    /// new frame from the latest `fft_size` samples.
    pub fn pull_frame(&mut self) -> &SpectrumFrame {
        self.drain();

        let len = self.history.len();
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = self.history[(self.write_pos + i) % len];
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.fft_scratch);

        let norm = 1.0 / len as f32;
        let range = self.max_db - self.min_db;
        let smoothing = self.smoothing;

        for ((smoothed, bin), out) in self
            .smoothed
            .iter_mut()
            .zip(&self.buffer)
            .zip(self.frame.bins.iter_mut())
        {
            let magnitude = bin.norm() * norm;
            *smoothed = smoothing * *smoothed + (1.0 - smoothing) * magnitude;

            let db = 20.0 * smoothed.max(MIN_MAGNITUDE).log10();
            let scaled = (db - self.min_db) / range * 255.0;
            *out = scaled.clamp(0.0, 255.0) as u8;
        }

        &self.frame
    }

    /// Endless stream of frames, one pull per `next()`.
    pub fn frames(&mut self) -> Frames<'_> {
        Frames { sampler: self }
    }
}

/// Iterator returned by [`SpectrumSampler::frames`]. Never yields `None`.
pub struct Frames<'a> {
    sampler: &'a mut SpectrumSampler,
}

impl Iterator for Frames<'_> {
    type Item = SpectrumFrame;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sampler.pull_frame().clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
