use std::f32::consts::PI;

use crate::graph::node::RenderCtx;

/*
Resonant Lowpass (TPT State-Variable Filter)
============================================

  cutoff_hz   Where the response starts to fall. Above it the slope is
              12 dB/octave.

  q           Emphasis around the cutoff. The lowpass gain exactly at the
              cutoff equals q, so:
                q = 0.707  flat (Butterworth), no bump
                q = 1.0    slight bump (+0 dB at cutoff, mild peak just below)
                q = 5.0    pronounced whistle on noise input

We use the topology-preserving transform form of the SVF:

    g = tan(pi * fc / fs)       prewarped integrator gain
    k = 1 / q                   damping
    h = 1 / (1 + g (g + k))

    v3 = x - ic2
    v1 = h (ic1 + g v3)         bandpass
    v2 = ic2 + g v1             lowpass
    ic1 = 2 v1 - ic1
    ic2 = 2 v2 - ic2

It stays stable for any positive q and for cutoff changes on every sample,
which is what lets the graph sweep cutoff/resonance smoothly without zipper
noise or blow-ups.

Coefficients only need recomputing when cutoff or q move. The graph calls
`set_cutoff`/`set_q` every sample while a ramp is running and leaves them
alone once it settles, so the `tan()` is skipped most of the time.
*/

/// Highest cutoff as a fraction of the sample rate; keeps `tan()` finite.
const MAX_CUTOFF_RATIO: f32 = 0.49;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,

    g: f32,
    k: f32,
    coeff_sample_rate: f32,
    dirty: bool,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q,
            g: 0.0,
            k: 1.0,
            coeff_sample_rate: 0.0,
            dirty: true,
        }
    }

    #[inline]
    fn update_coefficients(&mut self, sample_rate: f32) {
        let max_cutoff = (sample_rate * MAX_CUTOFF_RATIO).max(1.0);
        let cutoff = self.cutoff_hz.clamp(1.0, max_cutoff);
        self.g = (PI * cutoff / sample_rate).tan();
        self.k = 1.0 / self.q.max(f32::EPSILON);
        self.coeff_sample_rate = sample_rate;
        self.dirty = false;
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, sample_rate: f32) -> f32 {
        if self.dirty || self.coeff_sample_rate != sample_rate {
            self.update_coefficients(sample_rate);
        }

        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, ctx.sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    #[inline]
    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn set_q(&mut self, q: f32) {
        if q != self.q {
            self.q = q;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn ctx() -> RenderCtx {
        RenderCtx::new(SAMPLE_RATE)
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0, 0.707);
        let mut buffer = vec![1.0; 512];

        filter.render(&mut buffer, &ctx());

        assert!(buffer[511] > 0.99, "dc should pass, got {}", buffer[511]);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = SVFilter::lowpass(500.0, 0.707);
        let mut buffer = sine(5_000.0, 1024); // 10x cutoff

        filter.render(&mut buffer, &ctx());

        // ~12dB/octave over 3.3 octaves
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_set_cutoff_affects_filtering() {
        let test_freq = 1_000.0;

        let mut filter = SVFilter::lowpass(200.0, 0.707);
        let mut buffer1 = sine(test_freq, 2048);
        filter.render(&mut buffer1, &ctx());
        let peak_low_cutoff = peak_after_transient(&buffer1);

        filter.reset();
        filter.set_cutoff(5_000.0);
        let mut buffer2 = sine(test_freq, 2048);
        filter.render(&mut buffer2, &ctx());
        let peak_high_cutoff = peak_after_transient(&buffer2);

        assert!(
            peak_high_cutoff > peak_low_cutoff * 2.0,
            "High cutoff should pass more signal: high={}, low={}",
            peak_high_cutoff,
            peak_low_cutoff
        );
    }

    #[test]
    fn test_q_sets_gain_at_cutoff() {
        let cutoff = 1_000.0;

        let mut filter = SVFilter::lowpass(cutoff, 0.5);
        let mut buffer1 = sine(cutoff, 4096);
        filter.render(&mut buffer1, &ctx());
        let peak_low_q = peak_after_transient(&buffer1);

        filter.reset();
        filter.set_q(4.0);
        let mut buffer2 = sine(cutoff, 4096);
        filter.render(&mut buffer2, &ctx());
        let peak_high_q = peak_after_transient(&buffer2);

        assert!((peak_low_q - 0.5).abs() < 0.05, "low q peak {}", peak_low_q);
        assert!((peak_high_q - 4.0).abs() < 0.3, "high q peak {}", peak_high_q);
    }

    #[test]
    fn test_cutoff_above_nyquist_stays_finite() {
        let mut filter = SVFilter::lowpass(40_000.0, 1.0);
        let mut buffer = sine(440.0, 256);

        filter.render(&mut buffer, &ctx());

        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_set_q_updates_value() {
        let mut filter = SVFilter::lowpass(1000.0, 1.0);

        filter.set_q(2.0);
        assert!((filter.q - 2.0).abs() < 0.01);

        filter.set_q(5.0);
        assert!((filter.q - 5.0).abs() < 0.01);
    }
}
