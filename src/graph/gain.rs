use crate::{
    dsp::{Ramp, SmoothedParam},
    graph::node::{GraphNode, RenderCtx},
};

/*
Gain Stage
==========

    output[i] = input[i] x level[i]

`level` is a smoothed parameter, so the multiplier itself is a signal: during
a fade it changes every sample, which is what turns a hard start or stop into
a short swell or tail instead of a click.

  level = 0.0  silence
  level = 0.5  -6 dB
  level = 1.0  unity

The gain stage is never torn down, so swapping the source in front of it
leaves the level exactly where it was.
*/

pub struct GainNode {
    level: SmoothedParam,
}

impl GainNode {
    pub fn new(level: f32, sample_rate: f32) -> Self {
        Self {
            level: SmoothedParam::new(level, sample_rate),
        }
    }

    pub fn set_target(&mut self, level: f32, ramp: Ramp) {
        self.level.set_target(level, ramp);
    }

    /// Jump to `level`, cancelling any ramp.
    pub fn set_level(&mut self, level: f32) {
        self.level.set_value(level);
    }

    /// Instantaneous level (the multiplier applied to the last sample).
    pub fn level(&self) -> f32 {
        self.level.value()
    }

    pub fn target(&self) -> f32 {
        self.level.target()
    }

    pub fn is_settled(&self) -> bool {
        self.level.is_settled()
    }
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.level.is_settled() {
            apply_gain(out, self.level.value());
            return;
        }

        for sample in out.iter_mut() {
            *sample *= self.level.next_value();
        }
    }
}
