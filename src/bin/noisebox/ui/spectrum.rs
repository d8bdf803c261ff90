//! Spectrum analyzer widget
//!
//! Log-frequency view of the engine's spectrum frames.

use noisebox::SpectrumFrame;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Number of points drawn across the frequency axis
const SPECTRUM_POINTS: usize = 96;
const MIN_FREQ: f64 = 20.0;
const MAX_FREQ: f64 = 20_000.0;

/// Resample a frame onto log-spaced frequencies: `(log10(hz), level)`.
fn log_points(spectrum: &SpectrumFrame) -> Vec<(f64, f64)> {
    let nyquist = spectrum.bin_hz() as f64 * spectrum.len() as f64;
    let max_freq = nyquist.min(MAX_FREQ).max(MIN_FREQ);
    let ratio = max_freq / MIN_FREQ;

    (0..SPECTRUM_POINTS)
        .filter_map(|i| {
            let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
            let freq = MIN_FREQ * ratio.powf(t);
            spectrum
                .level_at(freq as f32)
                .map(|level| (freq.log10(), level as f64))
        })
        .collect()
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &SpectrumFrame) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let points = log_points(spectrum);
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([MIN_FREQ.log10(), MAX_FREQ.log10()])
                .labels(["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 255.0])
                .labels(["-100", "-65", "-30"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
