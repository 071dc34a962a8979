#![forbid(unsafe_code)]

//! Helpers for exercising a [`Choreographer`] without a host.
//!
//! [`RecordingSink`] keeps every sink call in order so tests can assert on
//! exact sequences; [`run_frames`] and [`run_until_idle`] drive a
//! choreographer at 60 Hz.

use std::time::Duration;

use recents_core::Axis;
use recents_layout::{LayoutStore, TileId};

use crate::choreographer::Choreographer;
use crate::handle::OrchestrationId;
use crate::sink::{Completion, HapticIntensity, MotionSink};

/// One frame at 60 Hz.
pub const FRAME: Duration = Duration::from_micros(16_667);

/// A recorded sink call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    Offset {
        tile: TileId,
        axis: Axis,
        value: f64,
    },
    LiveTransform {
        tile: TileId,
        axis: Axis,
        value: f64,
    },
    Redraw(TileId),
    Haptic(HapticIntensity),
    Remove {
        tile: TileId,
        animated: bool,
    },
    Complete {
        id: OrchestrationId,
        completion: Completion,
    },
}

/// A sink that remembers everything.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Number of events recorded so far; use as a cursor with
    /// [`events_since`](Self::events_since).
    #[must_use]
    pub fn mark(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn events_since(&self, mark: usize) -> &[SinkEvent] {
        self.events.get(mark..).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Every value written to `tile` on `axis`, in order.
    #[must_use]
    pub fn writes_for(&self, tile: TileId, axis: Axis) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                SinkEvent::Offset {
                    tile: t,
                    axis: a,
                    value,
                } if t == tile && a == axis => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Tiles written at least once, in first-write order.
    #[must_use]
    pub fn written_tiles(&self) -> Vec<TileId> {
        let mut tiles = Vec::new();
        for event in &self.events {
            if let SinkEvent::Offset { tile, .. } = *event {
                if !tiles.contains(&tile) {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    #[must_use]
    pub fn haptics(&self) -> Vec<HapticIntensity> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                SinkEvent::Haptic(intensity) => Some(intensity),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn removals(&self) -> Vec<TileId> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                SinkEvent::Remove { tile, .. } => Some(tile),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn completions(&self) -> Vec<(OrchestrationId, Completion)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                SinkEvent::Complete { id, completion } => Some((id, completion)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn redraws(&self, tile: TileId) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SinkEvent::Redraw(t) if *t == tile))
            .count()
    }
}

impl MotionSink for RecordingSink {
    fn set_offset(&mut self, tile: TileId, axis: Axis, value: f64) {
        self.events.push(SinkEvent::Offset { tile, axis, value });
    }

    fn set_live_transform(&mut self, tile: TileId, axis: Axis, value: f64) {
        self.events
            .push(SinkEvent::LiveTransform { tile, axis, value });
    }

    fn request_redraw(&mut self, tile: TileId) {
        self.events.push(SinkEvent::Redraw(tile));
    }

    fn play_settle_haptic(&mut self, intensity: HapticIntensity) {
        self.events.push(SinkEvent::Haptic(intensity));
    }

    fn remove_tile(&mut self, tile: TileId, animated: bool) {
        self.events.push(SinkEvent::Remove { tile, animated });
    }

    fn on_complete(&mut self, id: OrchestrationId, completion: Completion) {
        self.events.push(SinkEvent::Complete { id, completion });
    }
}

/// Tick `frames` times at 60 Hz.
pub fn run_frames<L: LayoutStore, S: MotionSink>(choreographer: &mut Choreographer<L, S>, frames: usize) {
    for _ in 0..frames {
        choreographer.tick(FRAME);
    }
}

/// Tick at 60 Hz until nothing runs. Returns the number of frames ticked,
/// or `None` if still busy after `max_frames`.
pub fn run_until_idle<L: LayoutStore, S: MotionSink>(
    choreographer: &mut Choreographer<L, S>,
    max_frames: usize,
) -> Option<usize> {
    for frame in 0..max_frames {
        if choreographer.is_idle() {
            return Some(frame);
        }
        choreographer.tick(FRAME);
    }
    choreographer.is_idle().then_some(max_frames)
}
