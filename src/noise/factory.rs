use tracing::debug;

use crate::{
    config::EngineConfig,
    dsp::noise::{NoiseColor, NoiseGenerator},
    error::{EngineError, Result},
    noise::buffer::NoiseBuffer,
};

/*
Seamless Loops
==============

Playback loops a finite buffer forever, so whatever happens between the last
sample and the first is heard every few seconds. For white noise any step is
as plausible as any other, but pink and especially brown noise are smooth:
a random jump at the seam is a click.

We render `len + fade` samples from the generator, then fold the overhang
back over the head:

  raw:    [ h0 h1 h2 ... h(f-1) | body ............ | t0 t1 ... t(f-1) ]
            ^-- head --------^                        ^-- overhang ---^
                                                       (continues body)

  out[i] = t_i * (1 - i/f) + h_i * (i/f)      for i in 0..f

At i = 0 the output is pure overhang, which is the generator's own next
sample after the body, so the jump from out[len-1] to out[0] is an ordinary
one-sample step. Over the fade the head blends back into the original stream.
Both inputs are in [-1, 1] and the weights sum to one, so the blend can't
clip.
*/

/// Builds one looping buffer per noise color from a fixed pseudo-random stream.
#[derive(Debug, Clone)]
pub struct NoiseBufferFactory {
    buffer_seconds: f32,
    crossfade_seconds: f32,
    seed: u64,
}

impl NoiseBufferFactory {
    pub fn new(buffer_seconds: f32, crossfade_seconds: f32, seed: u64) -> Self {
        Self {
            buffer_seconds,
            crossfade_seconds,
            seed,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.buffer_seconds,
            config.loop_crossfade_seconds,
            config.seed,
        )
    }

    pub fn generate(&self, color: NoiseColor, sample_rate: u32) -> Result<NoiseBuffer> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidParameter {
                name: "sample_rate",
                value: 0.0,
            });
        }

        let rate = sample_rate as f32;
        let len = ((self.buffer_seconds * rate).round() as usize).max(1);
        let fade = ((self.crossfade_seconds.max(0.0) * rate).round() as usize).min(len / 2);

        let mut raw = vec![0.0f32; len + fade];
        NoiseGenerator::new(color, self.seed_for(color)).fill(&mut raw);

        let (head, overhang) = raw.split_at_mut(len);
        for (i, (h, &t)) in head.iter_mut().zip(overhang.iter()).enumerate() {
            let w = i as f32 / fade as f32;
            *h = t * (1.0 - w) + *h * w;
        }

        raw.truncate(len);
        for sample in raw.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }

        debug!(%color, sample_rate, len, fade, "generated noise buffer");

        Ok(NoiseBuffer::new(color, sample_rate, raw.into_boxed_slice()))
    }

    // Each color gets its own stream derived from the base seed.
    fn seed_for(&self, color: NoiseColor) -> u64 {
        let salt: u64 = match color {
            NoiseColor::White => 0,
            NoiseColor::Pink => 1,
            NoiseColor::Brown => 2,
        };
        self.seed
            .wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl Default for NoiseBufferFactory {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
