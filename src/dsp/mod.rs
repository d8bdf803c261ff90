//! Low-level DSP primitives used by the graph stages.
//!
//! These components are allocation-free and realtime-safe, so the graph can
//! embed them directly and run them inside the audio callback. They stay
//! focused on the signal math; scheduling and ownership live one layer up.

/// Resonant state-variable lowpass.
pub mod filter;
/// White, pink and brown noise shaping.
pub mod noise;
/// Parameter ramps: linear fades and exponential approach.
pub mod smoothing;

pub use smoothing::{Ramp, SmoothedParam};
