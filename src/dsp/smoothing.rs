#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_TIME;

/*
Parameter Smoothing
===================

Jumping a gain or cutoff from one value to another between two samples is
audible: a step in gain is a click, a step in cutoff is a "zipper" tick. Every
parameter the listener can move is therefore advanced one sample at a time
toward a target.

Two shapes are supported:

  Linear        value walks from where it is to the target in exactly
                `seconds`. Used for start/stop fades, where the fade must be
                *finished* at a known time so the source can be detached.

                value(n) = start + (target - start) * n / total

  Exponential   value approaches the target with time constant tau; after
                tau seconds ~63% of the distance is covered, after 5 tau
                ~99%. Used for continuous controls (volume, cutoff, q) where
                new targets arrive at any moment and the curve must bend
                smoothly toward each new one.

                value(n+1) = target + (value(n) - target) * exp(-1 / (tau * fs))

  Level
    0.5 ┤             ___________          linear: straight, ends on time
        │          ╱
        │        ╱                         exponential: fast start,
        │      ╱       .-~~~~~~~~~~~       asymptotic finish
        │    ╱      .-'
        │  ╱     .'
    0.0 ┼╱_____.'_______________________→ time

Linear ramps interpolate from a snapshot of the start value rather than
adding a step each sample, so they land on the target exactly and never
overshoot it (a gain fading to 0 never goes negative).

Exponential ramps never reach the target mathematically, and in f32 they
stall a few ulps short of it once the step rounds to nothing. Either way,
when the distance falls under a small relative epsilon or a step no longer
moves the value, we snap and report the parameter as settled so downstream
stages can skip coefficient updates.
*/

/// How a parameter should move toward a new target.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    /// Jump on the next sample. Only for parameters nobody can hear right now.
    Immediate,
    /// Straight line, finishing after `seconds`.
    Linear { seconds: f32 },
    /// First-order approach with the given time constant in seconds.
    Exponential { time_constant: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Settled,
    Linear { start: f32, total: u32, elapsed: u32 },
    Exponential { coeff: f32 },
}

/// A parameter with a current value, a target and a ramp between them.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    value: f32,
    target: f32,
    motion: Motion,
    sample_rate: f32,
}

impl SmoothedParam {
    pub fn new(value: f32, sample_rate: f32) -> Self {
        Self {
            value,
            target: value,
            motion: Motion::Settled,
            sample_rate,
        }
    }

    /// Instantaneous value (what the last rendered sample used).
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.motion, Motion::Settled)
    }

    /// Jump to `value` and cancel any motion.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.motion = Motion::Settled;
    }

    /// Replace the current target. Any ramp in flight is cancelled and the new
    /// one starts from the current instantaneous value.
    pub fn set_target(&mut self, target: f32, ramp: Ramp) {
        self.target = target;

        self.motion = match ramp {
            Ramp::Immediate => {
                self.value = target;
                Motion::Settled
            }
            Ramp::Linear { seconds } => {
                let total = (seconds.max(MIN_TIME) * self.sample_rate).round().max(1.0) as u32;
                Motion::Linear {
                    start: self.value,
                    total,
                    elapsed: 0,
                }
            }
            Ramp::Exponential { time_constant } => {
                let samples = (time_constant.max(MIN_TIME) * self.sample_rate).max(1.0);
                Motion::Exponential {
                    coeff: (-1.0 / samples).exp(),
                }
            }
        };

        if self.value == target {
            self.motion = Motion::Settled;
        }
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        match &mut self.motion {
            Motion::Settled => {}
            Motion::Linear {
                start,
                total,
                elapsed,
            } => {
                *elapsed += 1;
                if *elapsed >= *total {
                    self.value = self.target;
                    self.motion = Motion::Settled;
                } else {
                    let t = *elapsed as f32 / *total as f32;
                    self.value = *start + (self.target - *start) * t;
                }
            }
            Motion::Exponential { coeff } => {
                let next = self.target + (self.value - self.target) * *coeff;
                let epsilon = (self.target.abs() * 1e-5).max(1e-6);
                // Near the target the step rounds away and `next` stops moving.
                if next == self.value || (next - self.target).abs() <= epsilon {
                    self.value = self.target;
                    self.motion = Motion::Settled;
                } else {
                    self.value = next;
                }
            }
        }

        self.value
    }
}
