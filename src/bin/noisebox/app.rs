//! Key handling and the draw loop.

use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::warn;

use noisebox::{
    control::{MAX_FREQUENCY_HZ, MAX_Q, MAX_VOLUME, MIN_FREQUENCY_HZ, MIN_Q, MIN_VOLUME},
    AudioState, NoiseColor, NoiseEngine,
};

use crate::ui::{self, View};

/// ~60 fps
const TICK: Duration = Duration::from_millis(16);
const VOLUME_STEP: f32 = 0.05;
/// Sixth of an octave per key press.
const CUTOFF_STEP: f32 = 1.122_462;
const Q_STEP: f32 = 1.25;

pub struct App {
    engine: NoiseEngine,
    state: AudioState,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: NoiseEngine) -> Self {
        let message = (!engine.is_supported()).then(|| "no audio output device".to_string());
        Self {
            engine,
            state: AudioState::default(),
            message,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        self.push_state();

        while !self.should_quit {
            let spectrum = self.engine.pull_spectrum_frame();
            let view = View {
                state: &self.state,
                transport: self.engine.transport(),
                sample_rate: self.engine.sample_rate(),
                spectrum: &spectrum,
                message: self.message.as_deref(),
            };
            terminal
                .draw(|frame| ui::render(frame, &view))
                .wrap_err("failed to draw frame")?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.shutdown();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        let state = &mut self.state;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => state.is_playing = !state.is_playing,
            KeyCode::Char('w') => state.noise_color = NoiseColor::White,
            KeyCode::Char('p') => state.noise_color = NoiseColor::Pink,
            KeyCode::Char('b') => state.noise_color = NoiseColor::Brown,
            KeyCode::Up => state.volume = (state.volume + VOLUME_STEP).min(MAX_VOLUME),
            KeyCode::Down => state.volume = (state.volume - VOLUME_STEP).max(MIN_VOLUME),
            KeyCode::Right => {
                state.filter_frequency = (state.filter_frequency * CUTOFF_STEP).min(MAX_FREQUENCY_HZ)
            }
            KeyCode::Left => {
                state.filter_frequency = (state.filter_frequency / CUTOFF_STEP).max(MIN_FREQUENCY_HZ)
            }
            KeyCode::Char(']') => state.filter_q = (state.filter_q * Q_STEP).min(MAX_Q),
            KeyCode::Char('[') => state.filter_q = (state.filter_q / Q_STEP).max(MIN_Q),
            _ => return,
        }
        self.push_state();
    }

    fn push_state(&mut self) {
        match self.engine.set_state(self.state) {
            Ok(_) if self.engine.is_supported() => self.message = None,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "state change rejected");
                self.message = Some(err.to_string());
            }
        }
    }
}
