use std::fmt;

use crate::dsp::noise::NoiseColor;

/// An immutable, loopable block of noise for one color.
///
/// Generated once per engine lifetime and shared read-only with the graph's
/// source stage through an `Arc`.
#[derive(Clone)]
pub struct NoiseBuffer {
    color: NoiseColor,
    sample_rate: u32,
    samples: Box<[f32]>,
}

impl NoiseBuffer {
    pub(crate) fn new(color: NoiseColor, sample_rate: u32, samples: Box<[f32]>) -> Self {
        Self {
            color,
            sample_rate,
            samples,
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate.max(1) as f32
    }

    /// Absolute step from the last sample back to the first.
    pub fn seam_delta(&self) -> f32 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first - last).abs(),
            _ => 0.0,
        }
    }

    /// Largest absolute step between neighbouring samples, not counting the seam.
    pub fn max_interior_delta(&self) -> f32 {
        self.samples
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .fold(0.0, f32::max)
    }
}

// Samples are omitted: a five second buffer is hundreds of thousands of floats.
impl fmt::Debug for NoiseBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseBuffer")
            .field("color", &self.color)
            .field("sample_rate", &self.sample_rate)
            .field("len", &self.samples.len())
            .finish()
    }
}
