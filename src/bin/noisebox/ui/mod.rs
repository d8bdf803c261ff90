//! TUI module for noisebox

mod spectrum;
mod status;

use noisebox::{AudioState, SpectrumFrame, TransportState};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use spectrum::render_spectrum;
use status::render_status;

/// Everything one frame draws.
pub struct View<'a> {
    pub state: &'a AudioState,
    pub transport: TransportState,
    pub sample_rate: Option<u32>,
    pub spectrum: &'a SpectrumFrame,
    pub message: Option<&'a str>,
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(8),    // Spectrum
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], view);
    render_spectrum(frame, chunks[1], view.spectrum);

    let help = Paragraph::new(
        " [Space] Play/Stop  [W/P/B] Color  [↑/↓] Volume  [←/→] Cutoff  [[/]] Q  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
