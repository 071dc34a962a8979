#![forbid(unsafe_code)]

//! The gap a removed tile leaves behind, and which side closes it.
//!
//! Signs are derived from three facts rather than special-cased:
//!
//! - `end` is the layout-space sign of "toward the end of the layout":
//!   `+1` left-to-right, `-1` right-to-left.
//! - `stride` is the removed tile's primary size plus page spacing: the
//!   distance one slot occupies.
//! - The viewport stays anchored to what the user is looking at. Removing a
//!   tile behind the visible page pulls earlier tiles forward; removing a
//!   visible or later tile pulls later tiles back.
//!
//! | removed tile                      | gap            | moving side |
//! |-----------------------------------|----------------|-------------|
//! | sole large tile, fully off-screen | `-end·stride`  | toward end  |
//! | behind the page                   | `+end·stride`  | toward start|
//! | visible or ahead of the page      | `-end·stride`  | toward end  |
//!
//! The first row covers the grid that loses its only large tile while it is
//! scrolled away: the large column disappears, so the rows advance by one
//! full page even though nothing ahead of them on screen moved.

use recents_core::Axis;

use crate::locator::{ChainDirection, TileSlot};
use crate::viewport::{PageRelation, Viewport};

/// Signed distance moving tiles travel to close a removed tile's slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflowGap {
    /// Primary-axis displacement of every moving tile's base position.
    pub distance: f64,
    /// Which side of the slot moves.
    pub moving: ChainDirection,
    /// The gap is the synthetic one-page reflow of an off-screen sole large
    /// tile.
    pub synthetic_page: bool,
}

impl ReflowGap {
    #[must_use]
    pub fn compute(slot: &TileSlot, viewport: &Viewport, sole_large: bool) -> Self {
        let stride = slot.tile.bounds.size(Axis::Primary, viewport.orientation) + viewport.page_spacing;
        let end = viewport.direction.end_sign();

        if sole_large && slot.relation != PageRelation::Visible {
            return Self {
                distance: -end * stride,
                moving: ChainDirection::TowardEnd,
                synthetic_page: true,
            };
        }

        match slot.relation {
            PageRelation::Behind => Self {
                distance: end * stride,
                moving: ChainDirection::TowardStart,
                synthetic_page: false,
            },
            PageRelation::Visible | PageRelation::Ahead => Self {
                distance: -end * stride,
                moving: ChainDirection::TowardEnd,
                synthetic_page: false,
            },
        }
    }

    /// Offset a moving tile needs at reflow start to stay where it was
    /// drawn before its base position jumped.
    #[inline]
    #[must_use]
    pub fn start_offset(&self) -> f64 {
        -self.distance
    }

    /// Nothing to animate.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.distance.abs() < f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use recents_core::{ReadingDirection, Rect};

    use super::*;
    use crate::locator::SlotPosition;
    use crate::tile::Tile;

    const WIDTH: f64 = 300.0;
    const SPACING: f64 = 40.0;
    const STRIDE: f64 = WIDTH + SPACING;

    fn slot(relation: PageRelation, large: bool) -> TileSlot {
        let mut tile = Tile::new(1, Rect::new(0.0, 0.0, WIDTH, 500.0));
        tile.is_large = large;
        TileSlot {
            tile,
            position: SlotPosition::Carousel(1),
            relation,
        }
    }

    fn viewport(direction: ReadingDirection) -> Viewport {
        Viewport::new(1_080.0)
            .with_page_spacing(SPACING)
            .with_direction(direction)
    }

    fn gap(direction: ReadingDirection, relation: PageRelation, sole_large: bool) -> ReflowGap {
        ReflowGap::compute(&slot(relation, sole_large), &viewport(direction), sole_large)
    }

    #[test]
    fn sign_table_regular_tiles() {
        use ChainDirection::{TowardEnd, TowardStart};
        use PageRelation::{Ahead, Behind, Visible};
        use ReadingDirection::{LeftToRight, RightToLeft};

        let table = [
            (LeftToRight, Behind, STRIDE, TowardStart),
            (LeftToRight, Visible, -STRIDE, TowardEnd),
            (LeftToRight, Ahead, -STRIDE, TowardEnd),
            (RightToLeft, Behind, -STRIDE, TowardStart),
            (RightToLeft, Visible, STRIDE, TowardEnd),
            (RightToLeft, Ahead, STRIDE, TowardEnd),
        ];
        for (direction, relation, distance, moving) in table {
            let g = gap(direction, relation, false);
            assert_eq!(g.distance, distance, "{direction:?} {relation:?}");
            assert_eq!(g.moving, moving, "{direction:?} {relation:?}");
            assert!(!g.synthetic_page);
        }
    }

    #[test]
    fn sign_table_sole_large_tile() {
        use PageRelation::{Ahead, Behind, Visible};
        use ReadingDirection::{LeftToRight, RightToLeft};

        let table = [
            (LeftToRight, Behind, -STRIDE, true),
            (LeftToRight, Visible, -STRIDE, false),
            (LeftToRight, Ahead, -STRIDE, true),
            (RightToLeft, Behind, STRIDE, true),
            (RightToLeft, Visible, STRIDE, false),
            (RightToLeft, Ahead, STRIDE, true),
        ];
        for (direction, relation, distance, synthetic) in table {
            let g = gap(direction, relation, true);
            assert_eq!(g.distance, distance, "{direction:?} {relation:?}");
            assert_eq!(g.moving, ChainDirection::TowardEnd);
            assert_eq!(g.synthetic_page, synthetic, "{direction:?} {relation:?}");
        }
    }

    #[test]
    fn moving_tiles_travel_toward_the_slot() {
        // Tiles past the slot in reading order move back toward it; tiles
        // before it move forward. In layout coordinates that is always
        // opposite to the side they sit on.
        for direction in [ReadingDirection::LeftToRight, ReadingDirection::RightToLeft] {
            let end = direction.end_sign();
            let closing_back = gap(direction, PageRelation::Visible, false);
            assert!(closing_back.distance * end < 0.0);
            let closing_forward = gap(direction, PageRelation::Behind, false);
            assert!(closing_forward.distance * end > 0.0);
        }
    }

    #[test]
    fn start_offset_compensates_jump() {
        let g = gap(ReadingDirection::LeftToRight, PageRelation::Visible, false);
        assert_eq!(g.start_offset(), STRIDE);
        assert!(!g.is_degenerate());
    }

    #[test]
    fn zero_stride_is_degenerate() {
        let mut s = slot(PageRelation::Visible, false);
        s.tile.bounds.width = 0.0;
        let g = ReflowGap::compute(&s, &Viewport::new(1_080.0), false);
        assert!(g.is_degenerate());
    }
}
