//! Control side: turning desired audio states into graph operations.

/// The user-facing audio state and its parameter domains.
pub mod state;
/// Diffing states into click-free graph transitions.
pub mod transition;

pub use state::{
    AudioState, MAX_FREQUENCY_HZ, MAX_Q, MAX_VOLUME, MIN_FREQUENCY_HZ, MIN_Q, MIN_VOLUME,
};
pub use transition::{Transition, TransitionController};
