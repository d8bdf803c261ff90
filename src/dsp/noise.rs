use std::fmt;

use rand::{rngs::SmallRng, Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Noise Colors
============

A noise "color" names the slope of its power spectrum:

  | color | slope         | per octave up | character               |
  | ----- | ------------- | ------------- | ----------------------- |
  | white | flat          |  0 dB         | hiss, bright, harsh     |
  | pink  | 1/f           | -3 dB         | rain, balanced          |
  | brown | 1/f^2         | -6 dB         | surf, rumble, deep      |

White is the raw material; the other two are white noise pushed through a
shaping filter.

  Pink: no finite filter has an exact -3 dB/octave slope, so we sum six
  one-pole lowpasses whose corners are staggered across the audio band. Each
  pole contributes a -6 dB/octave shelf; staggered, their sum averages out to
  -3 dB/octave within a fraction of a dB from ~10 Hz upward. The pole/weight
  table is the well known "refined" set; the sixth pole is negative so it
  tames the top octave. A bit of the white input is added straight through to
  fill the very top, then everything is scaled by 0.11 to land back around
  unit amplitude.

  Brown: the integral of white noise (a random walk) has exactly 1/f^2 power.
  A pure integrator drifts without bound though, so a small leak pulls it
  back toward zero:

      out = (out + 0.02 * white) / 1.02

  That puts a corner at roughly fs * 0.02 / 2pi (~140 Hz at 44.1 kHz); above
  it the slope is -6 dB/octave. The walk is quiet, so the output is scaled by
  3.5.
*/

const PINK_POLES: [(f32, f32); 6] = [
    (0.99886, 0.055_517_9),
    (0.99332, 0.075_075_9),
    (0.96900, 0.153_852_0),
    (0.86650, 0.310_485_6),
    (0.55000, 0.532_952_2),
    (-0.7616, -0.016_898_0),
];
const PINK_DIRECT: f32 = 0.5362;
const PINK_GAIN: f32 = 0.11;

const BROWN_STEP: f32 = 0.02;
const BROWN_LEAK: f32 = 0.02;
const BROWN_GAIN: f32 = 3.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

impl NoiseColor {
    pub const ALL: [NoiseColor; 3] = [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown];

    pub fn name(self) -> &'static str {
        match self {
            NoiseColor::White => "white",
            NoiseColor::Pink => "pink",
            NoiseColor::Brown => "brown",
        }
    }
}

impl fmt::Display for NoiseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform samples in [-1.0, 1.0] from a seeded generator.
#[derive(Clone, Debug)]
pub struct WhiteNoise {
    rng: SmallRng,
}

impl WhiteNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.rng.gen_range(-1.0f32..=1.0)
    }
}

/// Six-pole leaky-integrator bank approximating -3 dB/octave.
#[derive(Clone, Debug, Default)]
pub struct PinkFilter {
    b: [f32; 6],
}

impl PinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, white: f32) -> f32 {
        let mut sum = 0.0;
        for (state, &(pole, weight)) in self.b.iter_mut().zip(PINK_POLES.iter()) {
            *state = pole * *state + white * weight;
            sum += *state;
        }
        (sum + white * PINK_DIRECT) * PINK_GAIN
    }
}

/// Leaky integrator: a damped random walk with -6 dB/octave.
#[derive(Clone, Debug, Default)]
pub struct BrownFilter {
    last: f32,
}

impl BrownFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, white: f32) -> f32 {
        self.last = (self.last + BROWN_STEP * white) / (1.0 + BROWN_LEAK);
        self.last * BROWN_GAIN
    }
}

#[derive(Clone, Debug)]
enum Shaper {
    White,
    Pink(PinkFilter),
    Brown(BrownFilter),
}

/// Endless stream of colored noise.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    white: WhiteNoise,
    shaper: Shaper,
}

impl NoiseGenerator {
    pub fn new(color: NoiseColor, seed: u64) -> Self {
        let shaper = match color {
            NoiseColor::White => Shaper::White,
            NoiseColor::Pink => Shaper::Pink(PinkFilter::new()),
            NoiseColor::Brown => Shaper::Brown(BrownFilter::new()),
        };

        Self {
            white: WhiteNoise::new(seed),
            shaper,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let white = self.white.next_sample();
        match &mut self.shaper {
            Shaper::White => white,
            Shaper::Pink(filter) => filter.process(white),
            Shaper::Brown(filter) => filter.process(white),
        }
    }

    pub fn fill(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

impl Iterator for NoiseGenerator {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }
}
