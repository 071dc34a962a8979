#![forbid(unsafe_code)]

//! `TileLayout`: an owned carousel or grid of tiles.
//!
//! # Grid columns
//!
//! A grid is a sequence of visual columns. Each large tile occupies a column
//! of its own, in layout order. Row tiles follow: column `L + i` holds the
//! `i`-th top-row tile and the `i`-th bottom-row tile, where `L` is the
//! number of large tiles. Non-large tiles without a row are not part of any
//! grid column and are ignored by grid queries.
//!
//! # Failure Modes
//!
//! - Pushing a tile whose id is already present returns
//!   [`LayoutError::DuplicateTile`] and leaves the layout unchanged.
//! - Mutating an unknown tile returns [`LayoutError::UnknownTile`].

use recents_core::{Axis, ReadingDirection, Rect};

use crate::locator::{
    Arrangement, ChainDirection, ElementLocator, LayoutStore, Neighbor, OrderMode, Removal,
    SlotPosition, TileSlot,
};
use crate::reflow::ReflowGap;
use crate::tile::{Row, Tile, TileId};
use crate::viewport::Viewport;

/// Errors from layout mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("{0} is already in the layout")]
    DuplicateTile(TileId),
    #[error("{0} is not in the layout")]
    UnknownTile(TileId),
}

/// Tiles in layout order plus the viewport they scroll under.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayout {
    arrangement: Arrangement,
    tiles: Vec<Tile>,
    viewport: Viewport,
}

impl TileLayout {
    #[must_use]
    pub fn carousel(viewport: Viewport) -> Self {
        Self {
            arrangement: Arrangement::Carousel,
            tiles: Vec::new(),
            viewport,
        }
    }

    #[must_use]
    pub fn grid(viewport: Viewport) -> Self {
        Self {
            arrangement: Arrangement::Grid,
            tiles: Vec::new(),
            viewport,
        }
    }

    /// `count` equal tiles with ids `0..count`, laid out from the reading
    /// start.
    #[must_use]
    pub fn uniform_carousel(count: u32, width: f64, height: f64, viewport: Viewport) -> Self {
        let mut layout = Self::carousel(viewport);
        for index in 0..count {
            let x = layout.column_x(index as usize, width);
            layout
                .tiles
                .push(Tile::new(index, Rect::new(x, 0.0, width, height)));
        }
        layout
    }

    /// A grid of `large` large tiles (ids `0..large`) followed by `columns`
    /// columns of row tiles. Top-row ids come first, then bottom-row ids.
    #[must_use]
    pub fn uniform_grid(
        large: u32,
        columns: u32,
        width: f64,
        height: f64,
        viewport: Viewport,
    ) -> Self {
        let mut layout = Self::grid(viewport);
        let row_gap = viewport.page_spacing;
        for index in 0..large {
            let x = layout.column_x(index as usize, width);
            let bounds = Rect::new(x, 0.0, width, height * 2.0 + row_gap);
            layout.tiles.push(Tile::new(index, bounds).large());
        }
        for (row, y, first_id) in [
            (Row::Top, 0.0, large),
            (Row::Bottom, height + row_gap, large + columns),
        ] {
            for column in 0..columns {
                let x = layout.column_x((large + column) as usize, width);
                let tile = Tile::new(first_id + column, Rect::new(x, y, width, height)).in_row(row);
                layout.tiles.push(tile);
            }
        }
        layout
    }

    fn column_x(&self, column: usize, width: f64) -> f64 {
        let offset = column as f64 * (width + self.viewport.page_spacing);
        match self.viewport.direction {
            ReadingDirection::LeftToRight => offset,
            ReadingDirection::RightToLeft => self.viewport.extent - width - offset,
        }
    }

    /// Builder form of [`push`](Self::push) for layouts known to have
    /// unique ids. A duplicate id panics in debug builds and is dropped in
    /// release builds; use `push` to handle it.
    #[must_use]
    pub fn with_tile(mut self, tile: Tile) -> Self {
        let pushed = self.push(tile);
        debug_assert!(pushed.is_ok(), "duplicate tile id: {pushed:?}");
        self
    }

    pub fn push(&mut self, tile: Tile) -> Result<(), LayoutError> {
        if self.contains(tile.id) {
            return Err(LayoutError::DuplicateTile(tile.id));
        }
        self.tiles.push(tile);
        Ok(())
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn set_scroll(&mut self, scroll: f64) {
        self.viewport.scroll = scroll;
    }

    pub fn set_bounds(&mut self, id: TileId, bounds: Rect) -> Result<(), LayoutError> {
        let tile = self
            .tiles
            .iter_mut()
            .find(|tile| tile.id == id)
            .ok_or(LayoutError::UnknownTile(id))?;
        tile.bounds = bounds;
        Ok(())
    }

    fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.id == id)
    }

    // -----------------------------------------------------------------------
    // Grid columns
    // -----------------------------------------------------------------------

    fn grid_columns(&self) -> Vec<Vec<TileId>> {
        let mut columns: Vec<Vec<TileId>> = self.large_tiles().into_iter().map(|id| vec![id]).collect();
        let top = self.row_tiles(Row::Top);
        let bottom = self.row_tiles(Row::Bottom);
        for index in 0..top.len().max(bottom.len()) {
            let column = [top.get(index), bottom.get(index)]
                .into_iter()
                .flatten()
                .copied()
                .collect();
            columns.push(column);
        }
        columns
    }

    fn shift_primary(&mut self, ids: &[TileId], delta: f64) {
        let orientation = self.viewport.orientation;
        for tile in self.tiles.iter_mut().filter(|tile| ids.contains(&tile.id)) {
            tile.bounds = tile.bounds.translated(Axis::Primary, orientation, delta);
        }
    }
}

impl ElementLocator for TileLayout {
    fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    fn ordered_tiles(&self, mode: OrderMode) -> Vec<TileId> {
        match (self.arrangement, mode) {
            (Arrangement::Grid, OrderMode::GridTabOrder) => {
                self.grid_columns().into_iter().flatten().collect()
            }
            _ => self.tiles.iter().map(|tile| tile.id).collect(),
        }
    }

    fn adjacent_tiles(&self, pivot: TileId, direction: ChainDirection) -> Vec<Neighbor> {
        match self.arrangement {
            Arrangement::Carousel => {
                let Some(index) = self.index_of(pivot) else {
                    return Vec::new();
                };
                let neighbor = |tile: &Tile, distance: usize| Neighbor {
                    id: tile.id,
                    offset: distance as u32,
                };
                match direction {
                    ChainDirection::TowardEnd => self.tiles[index + 1..]
                        .iter()
                        .enumerate()
                        .map(|(i, tile)| neighbor(tile, i + 1))
                        .collect(),
                    ChainDirection::TowardStart => self.tiles[..index]
                        .iter()
                        .rev()
                        .enumerate()
                        .map(|(i, tile)| neighbor(tile, i + 1))
                        .collect(),
                }
            }
            Arrangement::Grid => {
                let columns = self.grid_columns();
                let Some(pivot_column) = columns.iter().position(|column| column.contains(&pivot))
                else {
                    return Vec::new();
                };
                let side: Vec<(usize, &Vec<TileId>)> = match direction {
                    ChainDirection::TowardEnd => columns
                        .iter()
                        .enumerate()
                        .skip(pivot_column + 1)
                        .map(|(index, column)| (index - pivot_column, column))
                        .collect(),
                    ChainDirection::TowardStart => columns[..pivot_column]
                        .iter()
                        .enumerate()
                        .rev()
                        .map(|(index, column)| (pivot_column - index, column))
                        .collect(),
                };
                side.into_iter()
                    .flat_map(|(distance, column)| {
                        column.iter().map(move |&id| Neighbor {
                            id,
                            offset: distance as u32,
                        })
                    })
                    .collect()
            }
        }
    }
}

impl LayoutStore for TileLayout {
    fn slot_of(&self, id: TileId) -> Option<TileSlot> {
        let index = self.index_of(id)?;
        let tile = self.tiles[index].clone();
        let position = match self.arrangement {
            Arrangement::Carousel => SlotPosition::Carousel(index),
            Arrangement::Grid if tile.is_large => {
                SlotPosition::Large(self.large_tiles().iter().position(|&t| t == id)?)
            }
            Arrangement::Grid => match tile.row {
                Row::None => SlotPosition::Carousel(index),
                row => SlotPosition::Row(row, self.row_tiles(row).iter().position(|&t| t == id)?),
            },
        };
        let relation = self.viewport.relation(&tile.bounds);
        Some(TileSlot {
            tile,
            position,
            relation,
        })
    }

    fn remove_tile(&mut self, id: TileId) -> Option<Removal> {
        let slot = self.slot_of(id)?;
        let sole_large = self.arrangement == Arrangement::Grid
            && slot.tile.is_large
            && self.large_tiles().len() == 1;
        let gap = ReflowGap::compute(&slot, &self.viewport, sole_large);

        self.tiles.retain(|tile| tile.id != id);

        let mut moving = self.vacated_neighbors(slot.position, gap.moving);
        if sole_large {
            moving.extend(self.row_tiles(Row::Top));
            moving.extend(self.row_tiles(Row::Bottom));
        }
        self.shift_primary(&moving, gap.distance);

        Some(Removal {
            slot,
            gap,
            sole_large,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::PageRelation;

    const W: f64 = 300.0;
    const H: f64 = 500.0;
    const SPACING: f64 = 40.0;

    fn viewport() -> Viewport {
        Viewport::new(1_000.0).with_page_spacing(SPACING)
    }

    fn ids(raw: &[u32]) -> Vec<TileId> {
        raw.iter().copied().map(TileId::new).collect()
    }

    fn neighbors(layout: &TileLayout, pivot: u32, direction: ChainDirection) -> Vec<(u32, u32)> {
        layout
            .adjacent_tiles(TileId::new(pivot), direction)
            .into_iter()
            .map(|n| (n.id.get(), n.offset))
            .collect()
    }

    #[test]
    fn push_rejects_duplicates() {
        let mut layout = TileLayout::carousel(viewport());
        let tile = Tile::new(1, Rect::new(0.0, 0.0, W, H));
        assert!(layout.push(tile.clone()).is_ok());
        assert_eq!(
            layout.push(tile),
            Err(LayoutError::DuplicateTile(TileId::new(1)))
        );
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn with_tile_builds_in_order() {
        let layout = TileLayout::carousel(viewport())
            .with_tile(Tile::new(4, Rect::new(0.0, 0.0, W, H)))
            .with_tile(Tile::new(2, Rect::new(340.0, 0.0, W, H)));
        let order: Vec<TileId> = layout.tiles().iter().map(|t| t.id).collect();
        assert_eq!(order, ids(&[4, 2]));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate tile id")]
    fn with_tile_panics_on_duplicate_in_debug() {
        let _ = TileLayout::carousel(viewport())
            .with_tile(Tile::new(1, Rect::new(0.0, 0.0, W, H)))
            .with_tile(Tile::new(1, Rect::new(340.0, 0.0, W, H)));
    }

    #[test]
    fn set_bounds_unknown_tile() {
        let mut layout = TileLayout::carousel(viewport());
        assert_eq!(
            layout.set_bounds(TileId::new(4), Rect::default()),
            Err(LayoutError::UnknownTile(TileId::new(4)))
        );
    }

    #[test]
    fn uniform_carousel_positions() {
        let layout = TileLayout::uniform_carousel(3, W, H, viewport());
        let xs: Vec<f64> = layout.tiles().iter().map(|t| t.bounds.x).collect();
        assert_eq!(xs, vec![0.0, 340.0, 680.0]);
    }

    #[test]
    fn uniform_carousel_rtl_starts_at_right_edge() {
        let vp = viewport().with_direction(ReadingDirection::RightToLeft);
        let layout = TileLayout::uniform_carousel(2, W, H, vp);
        let xs: Vec<f64> = layout.tiles().iter().map(|t| t.bounds.x).collect();
        assert_eq!(xs, vec![700.0, 360.0]);
    }

    #[test]
    fn carousel_adjacency_both_directions() {
        let layout = TileLayout::uniform_carousel(5, W, H, viewport());
        assert_eq!(
            neighbors(&layout, 2, ChainDirection::TowardEnd),
            vec![(3, 1), (4, 2)]
        );
        assert_eq!(
            neighbors(&layout, 2, ChainDirection::TowardStart),
            vec![(1, 1), (0, 2)]
        );
        assert!(neighbors(&layout, 4, ChainDirection::TowardEnd).is_empty());
    }

    #[test]
    fn absent_pivot_has_no_neighbors() {
        let layout = TileLayout::uniform_carousel(3, W, H, viewport());
        assert!(neighbors(&layout, 9, ChainDirection::TowardEnd).is_empty());
        let grid = TileLayout::uniform_grid(1, 3, W, H, viewport());
        assert!(neighbors(&grid, 9, ChainDirection::TowardStart).is_empty());
    }

    #[test]
    fn grid_tab_order_is_column_major() {
        let grid = TileLayout::uniform_grid(1, 3, W, H, viewport());
        assert_eq!(
            grid.ordered_tiles(OrderMode::GridTabOrder),
            ids(&[0, 1, 4, 2, 5, 3, 6])
        );
        assert_eq!(
            grid.ordered_tiles(OrderMode::Carousel),
            ids(&[0, 1, 2, 3, 4, 5, 6])
        );
    }

    #[test]
    fn grid_adjacency_uses_column_distance() {
        let grid = TileLayout::uniform_grid(1, 3, W, H, viewport());
        assert_eq!(
            neighbors(&grid, 2, ChainDirection::TowardEnd),
            vec![(3, 1), (6, 1)]
        );
        assert_eq!(
            neighbors(&grid, 2, ChainDirection::TowardStart),
            vec![(1, 1), (4, 1), (0, 2)]
        );
        assert_eq!(
            neighbors(&grid, 0, ChainDirection::TowardEnd),
            vec![(1, 1), (4, 1), (2, 2), (5, 2), (3, 3), (6, 3)]
        );
    }

    #[test]
    fn large_tiles_never_in_rows() {
        let mut grid = TileLayout::grid(viewport());
        grid.push(Tile::new(0, Rect::new(0.0, 0.0, W, H)).large().in_row(Row::Top))
            .unwrap();
        grid.push(Tile::new(1, Rect::new(340.0, 0.0, W, H)).in_row(Row::Top))
            .unwrap();
        assert_eq!(grid.row_tiles(Row::Top), ids(&[1]));
        assert_eq!(grid.large_tiles(), ids(&[0]));
        assert!(grid.row_tiles(Row::None).is_empty());
    }

    #[test]
    fn slot_positions() {
        let grid = TileLayout::uniform_grid(1, 3, W, H, viewport());
        assert_eq!(
            grid.slot_of(TileId::new(0)).map(|s| s.position),
            Some(SlotPosition::Large(0))
        );
        assert_eq!(
            grid.slot_of(TileId::new(5)).map(|s| s.position),
            Some(SlotPosition::Row(Row::Bottom, 1))
        );
        let carousel = TileLayout::uniform_carousel(3, W, H, viewport());
        assert_eq!(
            carousel.slot_of(TileId::new(2)).map(|s| s.position),
            Some(SlotPosition::Carousel(2))
        );
        assert!(carousel.slot_of(TileId::new(7)).is_none());
    }

    #[test]
    fn remove_visible_carousel_tile_pulls_later_tiles_back() {
        let mut layout = TileLayout::uniform_carousel(5, W, H, viewport());
        let removal = layout.remove_tile(TileId::new(1)).unwrap();
        assert_eq!(removal.slot.relation, PageRelation::Visible);
        assert_eq!(removal.gap.distance, -340.0);
        assert_eq!(removal.gap.moving, ChainDirection::TowardEnd);
        let xs: Vec<(u32, f64)> = layout
            .tiles()
            .iter()
            .map(|t| (t.id.get(), t.bounds.x))
            .collect();
        assert_eq!(xs, vec![(0, 0.0), (2, 340.0), (3, 680.0), (4, 1_020.0)]);
    }

    #[test]
    fn remove_tile_behind_page_pulls_earlier_tiles_forward() {
        let mut layout = TileLayout::uniform_carousel(6, W, H, viewport().with_scroll(1_360.0));
        let removal = layout.remove_tile(TileId::new(2)).unwrap();
        assert_eq!(removal.slot.relation, PageRelation::Behind);
        assert_eq!(removal.gap.distance, 340.0);
        let xs: Vec<(u32, f64)> = layout
            .tiles()
            .iter()
            .map(|t| (t.id.get(), t.bounds.x))
            .collect();
        assert_eq!(
            xs,
            vec![(0, 340.0), (1, 680.0), (3, 1_020.0), (4, 1_360.0), (5, 1_700.0)]
        );
    }

    #[test]
    fn remove_row_tile_moves_only_its_row() {
        let mut grid = TileLayout::uniform_grid(1, 3, W, H, viewport());
        let removal = grid.remove_tile(TileId::new(2)).unwrap();
        assert!(!removal.sole_large);
        assert_eq!(removal.slot.position, SlotPosition::Row(Row::Top, 1));
        let x = |id: u32| grid.tile(TileId::new(id)).map(|t| t.bounds.x);
        assert_eq!(x(3), Some(680.0));
        assert_eq!(x(1), Some(340.0));
        assert_eq!(x(6), Some(1_020.0));
    }

    #[test]
    fn remove_sole_large_tile_moves_every_row() {
        let mut grid = TileLayout::uniform_grid(1, 3, W, H, viewport().with_scroll(400.0));
        let removal = grid.remove_tile(TileId::new(0)).unwrap();
        assert!(removal.sole_large);
        assert!(removal.gap.synthetic_page);
        assert_eq!(removal.gap.distance, -340.0);
        for (id, expected) in [(1, 0.0), (4, 0.0), (3, 680.0), (6, 680.0)] {
            assert_eq!(
                grid.tile(TileId::new(id)).map(|t| t.bounds.x),
                Some(expected),
                "tile {id}"
            );
        }
    }

    #[test]
    fn remove_absent_tile_is_none() {
        let mut layout = TileLayout::uniform_carousel(2, W, H, viewport());
        assert!(layout.remove_tile(TileId::new(9)).is_none());
        assert_eq!(layout.len(), 2);
    }
}
