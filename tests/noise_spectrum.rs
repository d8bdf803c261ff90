//! Spectral shape of the generated loop buffers.
//!
//! Slopes are measured with a Welch periodogram (Hann window, 50% overlap)
//! and a least-squares fit of band power against octaves.

use std::f32::consts::PI;

use noisebox::{NoiseBuffer, NoiseBufferFactory, NoiseColor};
use rustfft::{num_complex::Complex, FftPlanner};

const SAMPLE_RATE: u32 = 44_100;
const NFFT: usize = 4096;

fn buffer(color: NoiseColor) -> NoiseBuffer {
    NoiseBufferFactory::default()
        .generate(color, SAMPLE_RATE)
        .unwrap()
}

/// Average power per bin over overlapping Hann-windowed segments.
fn welch_psd(samples: &[f32]) -> Vec<f64> {
    let fft = FftPlanner::<f32>::new().plan_fft_forward(NFFT);
    let window: Vec<f32> = (0..NFFT)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (NFFT - 1) as f32).cos()))
        .collect();

    let mut psd = vec![0.0f64; NFFT / 2];
    let mut segments = 0;
    let mut scratch = vec![Complex::new(0.0, 0.0); NFFT];

    for start in (0..=samples.len() - NFFT).step_by(NFFT / 2) {
        for (i, slot) in scratch.iter_mut().enumerate() {
            *slot = Complex::new(samples[start + i] * window[i], 0.0);
        }
        fft.process(&mut scratch);
        for (power, bin) in psd.iter_mut().zip(&scratch) {
            *power += bin.norm_sqr() as f64;
        }
        segments += 1;
    }

    psd.iter_mut().for_each(|p| *p /= segments as f64);
    psd
}

/// Mean power (dB) over a sixth of an octave either side of `center`.
fn band_db(psd: &[f64], center: f64) -> f64 {
    let bin_hz = SAMPLE_RATE as f64 / NFFT as f64;
    let lo = (center * 2f64.powf(-1.0 / 6.0) / bin_hz).floor() as usize;
    let hi = (center * 2f64.powf(1.0 / 6.0) / bin_hz).ceil() as usize;
    let band = &psd[lo..=hi];
    10.0 * (band.iter().sum::<f64>() / band.len() as f64).log10()
}

/// dB per octave between `low` and `high` (both octave-aligned).
fn slope_db_per_octave(color: NoiseColor, low: f64, high: f64) -> f64 {
    let psd = welch_psd(buffer(color).samples());

    let octaves = (high / low).log2().round() as usize;
    let points: Vec<(f64, f64)> = (0..=octaves)
        .map(|i| {
            let center = low * 2f64.powi(i as i32);
            (i as f64, band_db(&psd, center))
        })
        .collect();

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let cov: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let var: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    cov / var
}

#[test]
fn white_is_flat() {
    let slope = slope_db_per_octave(NoiseColor::White, 250.0, 8_000.0);
    assert!((-1.0..=1.0).contains(&slope), "white slope {slope:.2} dB/oct");
}

#[test]
fn pink_falls_three_db_per_octave() {
    let slope = slope_db_per_octave(NoiseColor::Pink, 200.0, 6_400.0);
    assert!((-4.0..=-2.0).contains(&slope), "pink slope {slope:.2} dB/oct");
}

#[test]
fn brown_falls_six_db_per_octave() {
    let slope = slope_db_per_octave(NoiseColor::Brown, 500.0, 4_000.0);
    assert!((-7.0..=-5.0).contains(&slope), "brown slope {slope:.2} dB/oct");
}

#[test]
fn every_color_loops_without_a_click() {
    for color in NoiseColor::ALL {
        let buffer = buffer(color);
        assert_eq!(buffer.len(), 5 * SAMPLE_RATE as usize);
        assert!(buffer.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(
            buffer.seam_delta() <= buffer.max_interior_delta(),
            "{color}: seam {} > interior {}",
            buffer.seam_delta(),
            buffer.max_interior_delta()
        );
    }
}

#[test]
fn white_matches_uniform_statistics() {
    let buffer = buffer(NoiseColor::White);
    let n = buffer.len() as f64;
    let mean = buffer.samples().iter().map(|&s| s as f64).sum::<f64>() / n;
    let mean_square = buffer.samples().iter().map(|&s| (s * s) as f64).sum::<f64>() / n;

    assert!(mean.abs() < 0.01, "mean {mean}");
    assert!((mean_square - 1.0 / 3.0).abs() < 0.01, "mean square {mean_square}");
}
