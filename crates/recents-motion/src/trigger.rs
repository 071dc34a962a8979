#![forbid(unsafe_code)]

//! One-shot threshold trigger.
//!
//! A driver spring moves in discrete steps and can jump over the threshold
//! between two ticks, so crossing is detected by comparing the last observed
//! value with the current one rather than testing equality.
//!
//! # Invariants
//!
//! 1. [`ThresholdTrigger::observe`] returns `Some` at most once over the
//!    trigger's lifetime.
//! 2. An idle trigger fires on its first observation with the configured
//!    minimum velocity, ignoring the observed one.
//! 3. An armed trigger fires with the observed velocity.

/// Lifecycle of a [`ThresholdTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Will fire on the next observation.
    Idle,
    /// Waiting for the driver to cross the threshold.
    Armed,
    /// Fired; latched.
    Fired,
}

/// Fires once when a driver crosses `threshold`.
#[derive(Debug, Clone)]
pub struct ThresholdTrigger {
    state: TriggerState,
    threshold: f64,
    last: f64,
    min_velocity: f64,
}

impl ThresholdTrigger {
    /// Arm at `threshold` if `start` lies strictly past it in `direction`
    /// (only the sign of `direction` matters). Otherwise the trigger starts
    /// idle and fires on the first observation with `min_velocity`.
    #[must_use]
    pub fn new(threshold: f64, start: f64, direction: f64, min_velocity: f64) -> Self {
        let past = (start - threshold) * direction.signum() > 0.0 && direction != 0.0;
        Self {
            state: if past {
                TriggerState::Armed
            } else {
                TriggerState::Idle
            },
            threshold,
            last: start,
            min_velocity,
        }
    }

    /// A trigger that fires on the first observation with `min_velocity`.
    #[must_use]
    pub fn immediate(min_velocity: f64) -> Self {
        Self {
            state: TriggerState::Idle,
            threshold: 0.0,
            last: 0.0,
            min_velocity,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.state == TriggerState::Fired
    }

    /// Feed the driver's value and velocity for this tick. Returns the
    /// cascade seed velocity on the tick the trigger fires.
    pub fn observe(&mut self, value: f64, velocity: f64) -> Option<f64> {
        match self.state {
            TriggerState::Fired => None,
            TriggerState::Idle => {
                self.state = TriggerState::Fired;
                self.last = value;
                Some(self.min_velocity)
            }
            TriggerState::Armed => {
                let t = self.threshold;
                let crossed = (self.last < t && t <= value) || (self.last > t && t >= value);
                self.last = value;
                if crossed {
                    self.state = TriggerState::Fired;
                    Some(velocity)
                } else {
                    None
                }
            }
        }
    }
}
