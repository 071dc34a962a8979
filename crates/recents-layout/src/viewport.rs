#![forbid(unsafe_code)]

//! Scroll and viewport state.

use recents_core::{Axis, Orientation, ReadingDirection, Rect};

/// Where a tile sits relative to the visible page, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRelation {
    /// Entirely past the viewport's start edge.
    Behind,
    /// At least partly visible.
    Visible,
    /// Entirely past the viewport's end edge.
    Ahead,
}

/// The visible window onto the tile strip.
///
/// `scroll` is the layout-space coordinate of the viewport's low edge on the
/// primary axis (the left edge for horizontal layouts regardless of reading
/// direction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll: f64,
    pub extent: f64,
    pub page_spacing: f64,
    pub direction: ReadingDirection,
    pub orientation: Orientation,
}

impl Viewport {
    #[must_use]
    pub fn new(extent: f64) -> Self {
        Self {
            scroll: 0.0,
            extent,
            page_spacing: 0.0,
            direction: ReadingDirection::LeftToRight,
            orientation: Orientation::Horizontal,
        }
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: f64) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn with_page_spacing(mut self, spacing: f64) -> Self {
        self.page_spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Whether `bounds`, moved by `extra_offset` on the primary axis,
    /// intersects the viewport.
    #[must_use]
    pub fn shows(&self, bounds: &Rect, extra_offset: f64) -> bool {
        let start = bounds.start(Axis::Primary, self.orientation) + extra_offset;
        let end = start + bounds.size(Axis::Primary, self.orientation);
        start < self.scroll + self.extent && end > self.scroll
    }

    /// Reading-order relation of `bounds` to the visible page.
    #[must_use]
    pub fn relation(&self, bounds: &Rect) -> PageRelation {
        let start = bounds.start(Axis::Primary, self.orientation);
        let end = bounds.end(Axis::Primary, self.orientation);
        let below_low_edge = end <= self.scroll;
        let above_high_edge = start >= self.scroll + self.extent;
        match (self.direction, below_low_edge, above_high_edge) {
            (ReadingDirection::LeftToRight, true, _) | (ReadingDirection::RightToLeft, _, true) => {
                PageRelation::Behind
            }
            (ReadingDirection::LeftToRight, _, true) | (ReadingDirection::RightToLeft, true, _) => {
                PageRelation::Ahead
            }
            _ => PageRelation::Visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_at(x: f64) -> Rect {
        Rect::new(x, 0.0, 100.0, 200.0)
    }

    #[test]
    fn shows_partial_overlap() {
        let vp = Viewport::new(500.0).with_scroll(100.0);
        assert!(vp.shows(&tile_at(50.0), 0.0));
        assert!(vp.shows(&tile_at(550.0), 0.0));
        assert!(!vp.shows(&tile_at(0.0), 0.0));
        assert!(!vp.shows(&tile_at(600.0), 0.0));
    }

    #[test]
    fn shows_with_candidate_translation() {
        let vp = Viewport::new(500.0);
        assert!(!vp.shows(&tile_at(700.0), 0.0));
        assert!(vp.shows(&tile_at(700.0), -300.0));
    }

    #[test]
    fn relation_ltr() {
        let vp = Viewport::new(500.0).with_scroll(1_000.0);
        assert_eq!(vp.relation(&tile_at(800.0)), PageRelation::Behind);
        assert_eq!(vp.relation(&tile_at(1_200.0)), PageRelation::Visible);
        assert_eq!(vp.relation(&tile_at(1_600.0)), PageRelation::Ahead);
    }

    #[test]
    fn relation_rtl_flips_edges() {
        let vp = Viewport::new(500.0)
            .with_scroll(1_000.0)
            .with_direction(ReadingDirection::RightToLeft);
        assert_eq!(vp.relation(&tile_at(800.0)), PageRelation::Ahead);
        assert_eq!(vp.relation(&tile_at(1_600.0)), PageRelation::Behind);
    }

    #[test]
    fn vertical_orientation_uses_y() {
        let vp = Viewport::new(500.0).with_orientation(Orientation::Vertical);
        let rect = Rect::new(5_000.0, 100.0, 100.0, 100.0);
        assert!(vp.shows(&rect, 0.0));
        assert!(!vp.shows(&rect, 450.0));
    }
}
