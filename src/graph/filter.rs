use crate::{
    dsp::{filter::SVFilter, Ramp, SmoothedParam},
    graph::node::{GraphNode, RenderCtx},
};

/*
Lowpass Stage
=============

Wraps the state-variable lowpass with a smoothed cutoff and q. Each has a
current value (what the filter is using right now) and a target (where it is
heading). New targets arrive from the control side at arbitrary times; the
stage walks toward them one sample at a time so a slider drag sounds like a
sweep, not a staircase.

Cutoff (Hz): 20 .. 20000
  - 200 Hz:    muffled, like through a wall
  - 1000 Hz:   warm
  - 5000 Hz:   present
  - 20000 Hz:  fully open

Q: emphasis at the cutoff
  - 0.707:     flat
  - 1 .. 5:    audible bump, noise starts to "whistle"
  - 10+:       strong ringing tone at the cutoff

While both parameters are settled the stage runs the plain block loop; while
either moves it feeds the filter per sample.
*/

pub struct FilterNode {
    filter: SVFilter,
    cutoff: SmoothedParam,
    q: SmoothedParam,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz, q),
            cutoff: SmoothedParam::new(cutoff_hz, sample_rate),
            q: SmoothedParam::new(q, sample_rate),
        }
    }

    pub fn set_target(&mut self, cutoff_hz: f32, q: f32, ramp: Ramp) {
        self.cutoff.set_target(cutoff_hz, ramp);
        self.q.set_target(q, ramp);

        if matches!(ramp, Ramp::Immediate) {
            self.filter.set_cutoff(cutoff_hz);
            self.filter.set_q(q);
        }
    }

    /// Instantaneous cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff.value()
    }

    /// Instantaneous resonance.
    pub fn q(&self) -> f32 {
        self.q.value()
    }

    /// Where cutoff and q are heading.
    pub fn target(&self) -> (f32, f32) {
        (self.cutoff.target(), self.q.target())
    }

    pub fn is_settled(&self) -> bool {
        self.cutoff.is_settled() && self.q.is_settled()
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.is_settled() {
            self.filter.render(out, ctx);
            return;
        }

        for sample in out.iter_mut() {
            self.filter.set_cutoff(self.cutoff.next_value());
            self.filter.set_q(self.q.next_value());
            *sample = self.filter.next_sample(*sample, ctx.sample_rate);
        }
    }
}
