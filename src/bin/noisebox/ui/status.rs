//! Status bar widget - play state, color and filter settings

use noisebox::TransportState;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::View;

pub fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" noisebox ").borders(Borders::ALL);

    let (symbol, label, color) = match view.transport {
        TransportState::Stopped => ("■", "Stopped", Color::Yellow),
        TransportState::Starting => ("▶", "Starting", Color::LightGreen),
        TransportState::Playing => ("▶", "Playing", Color::Green),
        TransportState::Stopping => ("■", "Stopping", Color::LightYellow),
    };

    let state = view.state;
    let mut spans = vec![
        Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("{:<6} ", state.noise_color.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Vol: {:>3.0}%  ", state.volume * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Cutoff: {}  Q: {:.2}  ", format_hz(state.filter_frequency), state.filter_q),
            Style::default().fg(Color::Magenta),
        ),
    ];

    match (view.message, view.sample_rate) {
        (Some(message), _) => spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        (None, Some(rate)) => spans.push(Span::styled(
            format!("{:.1}kHz", rate as f32 / 1000.0),
            Style::default().fg(Color::DarkGray),
        )),
        (None, None) => {}
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn format_hz(hz: f32) -> String {
    if hz >= 1000.0 {
        format!("{:.1}kHz", hz / 1000.0)
    } else {
        format!("{hz:.0}Hz")
    }
}
