//! Error types for the noise engine.
//!
//! None of these ever reach the audio callback: validation and clamping happen
//! on the control side, and a missing device degrades the engine to silence.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// No usable audio output (no device, no sample rate, stream refused).
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// A control value outside its documented domain. Reported, then clamped.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// An attach/detach request that contradicts the single-source invariant.
    #[error("graph inconsistency: {0}")]
    GraphInconsistency(&'static str),

    /// The control -> audio command ring had no free slot.
    #[error("command queue full")]
    QueueFull,

    #[error("failed to query output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to spawn {0} thread")]
    Spawn(&'static str, #[source] std::io::Error),
}

impl EngineError {
    /// Whether this error means the device side is unusable and the engine
    /// should fall back to the silent stub.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            EngineError::UnsupportedEnvironment(_)
                | EngineError::OutputConfig(_)
                | EngineError::BuildStream(_)
                | EngineError::PlayStream(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
