#![forbid(unsafe_code)]

//! Outputs of the motion engine.
//!
//! The engine never touches views. Everything it wants drawn, felt or
//! removed goes through a [`MotionSink`], in the order it happened within a
//! tick.

use recents_core::Axis;
use recents_layout::TileId;

use crate::handle::OrchestrationId;

/// Haptic strength in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct HapticIntensity(f64);

impl HapticIntensity {
    pub const FULL: Self = Self(1.0);

    /// Clamp into `[0, 1]`. NaN maps to zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// `|velocity| / full_scale`, clamped.
    #[must_use]
    pub fn from_velocity(velocity: f64, full_scale: f64) -> Self {
        if full_scale <= 0.0 {
            return Self::FULL;
        }
        Self::new(velocity.abs() / full_scale)
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// How an orchestration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion {
    /// A released tile returned to rest.
    Settled,
    /// A dismissed tile left and its neighbours came to rest.
    Dismissed,
    /// Tiles closed the gap left by a removed tile.
    Reflowed,
    /// Cancelled through its handle or by a newer orchestration.
    Cancelled,
    /// The pivot disappeared from the layout underneath the orchestration.
    Abandoned,
}

/// Receiver of every side effect the engine produces.
pub trait MotionSink {
    /// Write a tile's animated offset on one axis.
    fn set_offset(&mut self, tile: TileId, axis: Axis, value: f64);

    /// Mirror an offset into a live tile's surface transform.
    fn set_live_transform(&mut self, _tile: TileId, _axis: Axis, _value: f64) {}

    /// Ask a live tile to redraw this frame.
    fn request_redraw(&mut self, _tile: TileId) {}

    fn play_settle_haptic(&mut self, intensity: HapticIntensity);

    /// The tile has left the layout.
    fn remove_tile(&mut self, tile: TileId, animated: bool);

    /// Called exactly once per orchestration.
    fn on_complete(&mut self, id: OrchestrationId, completion: Completion);
}

impl<S: MotionSink + ?Sized> MotionSink for &mut S {
    fn set_offset(&mut self, tile: TileId, axis: Axis, value: f64) {
        (**self).set_offset(tile, axis, value);
    }

    fn set_live_transform(&mut self, tile: TileId, axis: Axis, value: f64) {
        (**self).set_live_transform(tile, axis, value);
    }

    fn request_redraw(&mut self, tile: TileId) {
        (**self).request_redraw(tile);
    }

    fn play_settle_haptic(&mut self, intensity: HapticIntensity) {
        (**self).play_settle_haptic(intensity);
    }

    fn remove_tile(&mut self, tile: TileId, animated: bool) {
        (**self).remove_tile(tile, animated);
    }

    fn on_complete(&mut self, id: OrchestrationId, completion: Completion) {
        (**self).on_complete(id, completion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_clamps() {
        assert_eq!(HapticIntensity::new(1.7).get(), 1.0);
        assert_eq!(HapticIntensity::new(-0.2).get(), 0.0);
        assert_eq!(HapticIntensity::new(f64::NAN).get(), 0.0);
        assert_eq!(HapticIntensity::new(0.25).get(), 0.25);
    }

    #[test]
    fn intensity_from_velocity() {
        assert_eq!(HapticIntensity::from_velocity(-500.0, 2_000.0).get(), 0.25);
        assert_eq!(HapticIntensity::from_velocity(9_000.0, 2_000.0), HapticIntensity::FULL);
        assert_eq!(HapticIntensity::from_velocity(10.0, 0.0), HapticIntensity::FULL);
    }
}
