#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) used by every tile animation.
//!
//! Each spring models a unit mass pulled toward `target`:
//!
//!   a = -k × (position - target) - c × velocity,   c = 2 × ζ × √k
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength. Higher = faster response.
//! - **damping ratio** (ζ): 1.0 is critical damping. Below 1.0 the spring
//!   overshoots its target and oscillates; above 1.0 it creeps in.
//!
//! # Integration
//!
//! Semi-implicit Euler with sub-stepping: a frame delta is split into steps
//! of at most 4ms so stiff presets stay stable when a frame is dropped.
//! Every call site (dismiss, settle, reflow) integrates the same way; only
//! the parameters differ.
//!
//! # Invariants
//!
//! 1. `SpringParams` always holds finite, strictly positive stiffness and
//!    damping ratio. Invalid values are rejected by [`SpringParams::new`].
//! 2. A spring at rest sits exactly on its target with zero velocity.
//! 3. A spring at rest does not integrate until its target moves beyond the
//!    rest displacement or it is launched with a velocity.
//! 4. Integration is deterministic: the same inputs give bit-identical
//!    trajectories.

use std::time::Duration;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest displacement in pixels.
pub const DEFAULT_REST_DISPLACEMENT: f64 = 0.5;

/// Default rest velocity in pixels per second.
pub const DEFAULT_REST_VELOCITY: f64 = 5.0;

/// Rejected spring parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SpringParamsError {
    #[error("stiffness must be finite and > 0, got {0}")]
    Stiffness(f64),
    #[error("damping ratio must be finite and > 0, got {0}")]
    DampingRatio(f64),
}

/// Validated stiffness / damping-ratio pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    stiffness: f64,
    damping_ratio: f64,
}

impl SpringParams {
    /// Validate and build spring parameters.
    ///
    /// # Errors
    ///
    /// Returns an error when either value is non-finite or not strictly
    /// positive.
    pub fn new(stiffness: f64, damping_ratio: f64) -> Result<Self, SpringParamsError> {
        if !stiffness.is_finite() || stiffness <= 0.0 {
            return Err(SpringParamsError::Stiffness(stiffness));
        }
        if !damping_ratio.is_finite() || damping_ratio <= 0.0 {
            return Err(SpringParamsError::DampingRatio(damping_ratio));
        }
        Ok(Self {
            stiffness,
            damping_ratio,
        })
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Damping coefficient `c = 2ζ√k` for a unit mass.
    #[inline]
    #[must_use]
    pub fn damping_coefficient(&self) -> f64 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }

    /// Same stiffness with `extra` added to the damping ratio.
    ///
    /// Negative or non-finite `extra` is ignored so the result stays valid.
    #[must_use]
    pub fn with_additional_damping(self, extra: f64) -> Self {
        let extra = if extra.is_finite() { extra.max(0.0) } else { 0.0 };
        Self {
            stiffness: self.stiffness,
            damping_ratio: self.damping_ratio + extra,
        }
    }
}

/// A damped harmonic oscillator producing physically-based motion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use recents_core::spring::{Spring, SpringParams};
///
/// let params = SpringParams::new(800.0, 0.75).unwrap();
/// let mut spring = Spring::new(params, 0.0, 300.0);
///
/// // Simulate at 60fps
/// for _ in 0..120 {
///     spring.step(Duration::from_millis(16));
/// }
///
/// assert!(spring.is_at_rest());
/// assert_eq!(spring.position(), 300.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    params: SpringParams,
    rest_displacement: f64,
    rest_velocity: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `position` heading for `target` with zero velocity.
    #[must_use]
    pub fn new(params: SpringParams, position: f64, target: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target,
            params,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
            at_rest: false,
        }
    }

    /// A spring sitting at rest on `position`.
    #[must_use]
    pub fn resting(params: SpringParams, position: f64) -> Self {
        let mut spring = Self::new(params, position, position);
        spring.at_rest = true;
        spring
    }

    /// Set the initial velocity (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self.at_rest = false;
        self
    }

    /// Set rest thresholds (builder pattern). Negative values take abs.
    #[must_use]
    pub fn with_rest_thresholds(mut self, displacement: f64, velocity: f64) -> Self {
        self.rest_displacement = displacement.abs();
        self.rest_velocity = velocity.abs();
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity in units per second.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target (rest position).
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> SpringParams {
        self.params
    }

    /// Whether the spring has settled on its target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Change the target.
    ///
    /// A spring at rest wakes only when the target moves by more than the
    /// rest displacement; smaller moves are absorbed by snapping onto the
    /// new target.
    pub fn set_target(&mut self, target: f64) {
        let moved = (self.target - target).abs() > self.rest_displacement;
        self.target = target;
        if moved {
            self.at_rest = false;
        } else if self.at_rest {
            self.position = target;
        }
    }

    /// Replace the velocity and wake the spring.
    pub fn launch(&mut self, velocity: f64) {
        self.velocity = velocity;
        self.at_rest = false;
    }

    /// Single semi-implicit Euler step of `dt` seconds.
    fn integrate(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.params.stiffness * displacement;
        let damping_force = -self.params.damping_coefficient() * self.velocity;
        let acceleration = spring_force + damping_force;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.integrate(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        if pos_delta < self.rest_displacement && self.velocity.abs() < self.rest_velocity {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    /// Advance by `dt` and report `(value, velocity)`.
    pub fn step(&mut self, dt: Duration) -> (f64, f64) {
        self.advance(dt);
        (self.position, self.velocity)
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Stiffness and damping tiers used by the platform's physics animations.
pub mod presets {
    pub const STIFFNESS_HIGH: f64 = 10_000.0;
    pub const STIFFNESS_MEDIUM: f64 = 1_500.0;
    pub const STIFFNESS_LOW: f64 = 200.0;
    pub const STIFFNESS_VERY_LOW: f64 = 50.0;

    pub const DAMPING_RATIO_HIGH_BOUNCY: f64 = 0.2;
    pub const DAMPING_RATIO_MEDIUM_BOUNCY: f64 = 0.5;
    pub const DAMPING_RATIO_LOW_BOUNCY: f64 = 0.75;
    pub const DAMPING_RATIO_NO_BOUNCY: f64 = 1.0;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
