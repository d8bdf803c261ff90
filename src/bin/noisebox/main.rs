//! noisebox - terminal noise generator
//!
//! Run with: cargo run
//! Logs go to stderr; enable them with RUST_LOG (e.g. RUST_LOG=noisebox=debug 2>log).

mod app;
mod ui;

use app::App;
use noisebox::{EngineConfig, NoiseEngine};
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let engine = NoiseEngine::new(EngineConfig::default());

    let terminal = ratatui::init();
    let res = App::new(engine).run(terminal);
    ratatui::restore();
    res
}

fn init_tracing() {
    // Off unless asked for: anything on the terminal would tear the TUI.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
