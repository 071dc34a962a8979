#![forbid(unsafe_code)]

//! Read-only queries over the current tile layout.
//!
//! # Invariants
//!
//! 1. Every query is side-effect free.
//! 2. Unknown tile ids never error: sequences come back empty and
//!    predicates come back `false`.
//! 3. Neighbour sequences are nearest-first with strictly positive,
//!    non-decreasing offsets, and never contain the pivot.
//! 4. Large-tile classification beats row membership: a large tile is never
//!    returned by [`ElementLocator::row_tiles`].

use crate::reflow::ReflowGap;
use crate::tile::{Row, Tile, TileId};
use crate::viewport::{PageRelation, Viewport};

/// How tiles are arranged on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrangement {
    /// One scrolling row of equally treated tiles.
    #[default]
    Carousel,
    /// Large tiles first, then a two-row grid.
    Grid,
}

/// Traversal order for [`ElementLocator::ordered_tiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    /// Plain layout order.
    Carousel,
    /// Large tiles, then row tiles column by column, top before bottom.
    GridTabOrder,
}

/// Fan-out direction from a pivot, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainDirection {
    TowardStart,
    TowardEnd,
}

impl ChainDirection {
    pub const BOTH: [Self; 2] = [Self::TowardStart, Self::TowardEnd];
}

/// A tile near a pivot and its visual distance from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub id: TileId,
    /// Index distance in a carousel, column distance in a grid.
    pub offset: u32,
}

/// Where a tile sits in its arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPosition {
    /// Index in carousel order.
    Carousel(usize),
    /// Index among large grid tiles.
    Large(usize),
    /// Index within a grid row.
    Row(Row, usize),
}

/// Snapshot of a tile and its place, taken before the tile is removed.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSlot {
    pub tile: Tile,
    pub position: SlotPosition,
    pub relation: PageRelation,
}

/// Result of removing a tile from a [`LayoutStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub slot: TileSlot,
    pub gap: ReflowGap,
    /// The removed tile was the only large tile of a grid; every row tile
    /// moves with the gap.
    pub sole_large: bool,
}

/// Read-only layout queries used by the chain builder and orchestrator.
pub trait ElementLocator {
    fn arrangement(&self) -> Arrangement;

    fn viewport(&self) -> &Viewport;

    fn tile(&self, id: TileId) -> Option<&Tile>;

    /// Full traversal order.
    fn ordered_tiles(&self, mode: OrderMode) -> Vec<TileId>;

    /// Neighbours of `pivot` in visual order, nearest first.
    fn adjacent_tiles(&self, pivot: TileId, direction: ChainDirection) -> Vec<Neighbor>;

    fn contains(&self, id: TileId) -> bool {
        self.tile(id).is_some()
    }

    fn row_of(&self, id: TileId) -> Row {
        self.tile(id).map_or(Row::None, |tile| tile.row)
    }

    fn is_large_tile(&self, id: TileId) -> bool {
        self.tile(id).is_some_and(|tile| tile.is_large)
    }

    fn is_running_live(&self, id: TileId) -> bool {
        self.tile(id).is_some_and(|tile| tile.is_running_live)
    }

    /// Whether the tile, moved by `extra_offset` on the primary axis, would
    /// intersect the viewport.
    fn is_on_screen(&self, id: TileId, extra_offset: f64) -> bool {
        self.tile(id)
            .is_some_and(|tile| self.viewport().shows(&tile.bounds, extra_offset))
    }

    /// Large tiles in layout order.
    fn large_tiles(&self) -> Vec<TileId> {
        self.ordered_tiles(OrderMode::Carousel)
            .into_iter()
            .filter(|&id| self.is_large_tile(id))
            .collect()
    }

    /// Non-large tiles of `row` in layout order.
    fn row_tiles(&self, row: Row) -> Vec<TileId> {
        if row == Row::None {
            return Vec::new();
        }
        self.ordered_tiles(OrderMode::Carousel)
            .into_iter()
            .filter(|&id| !self.is_large_tile(id) && self.row_of(id) == row)
            .collect()
    }

    /// Tiles on one side of a vacated slot, nearest first.
    ///
    /// Queried after the slot's tile is gone: the tile now at the slot index
    /// is the first one toward the end.
    fn vacated_neighbors(&self, position: SlotPosition, direction: ChainDirection) -> Vec<TileId> {
        let (candidates, index) = match position {
            SlotPosition::Carousel(index) => (self.ordered_tiles(OrderMode::Carousel), index),
            SlotPosition::Large(index) => (self.large_tiles(), index),
            SlotPosition::Row(row, index) => (self.row_tiles(row), index),
        };
        let split = index.min(candidates.len());
        match direction {
            ChainDirection::TowardStart => candidates[..split].iter().rev().copied().collect(),
            ChainDirection::TowardEnd => candidates[split..].to_vec(),
        }
    }
}

/// A locator whose tile list the motion engine may shrink.
pub trait LayoutStore: ElementLocator {
    /// Snapshot of a tile and its place, or `None` if absent.
    fn slot_of(&self, id: TileId) -> Option<TileSlot>;

    /// Remove a tile and move the tiles that close its gap to their new base
    /// positions. Returns `None` if the tile is absent.
    fn remove_tile(&mut self, id: TileId) -> Option<Removal>;
}
