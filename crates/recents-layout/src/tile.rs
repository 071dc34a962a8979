#![forbid(unsafe_code)]

//! Tile identity and classification.

use std::fmt;

use recents_core::Rect;

/// Stable identifier of a laid-out tile.
///
/// Unique among the tiles currently in a layout; a removed tile's id may be
/// reused by the host for a later binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u32);

impl TileId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for TileId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Grid row membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Row {
    Top,
    Bottom,
    /// Carousel tiles and large grid tiles.
    #[default]
    None,
}

/// One tile of the overview.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    /// Base position in layout space, before any dismiss offset.
    pub bounds: Rect,
    pub row: Row,
    /// Exempt from row grouping (focused task, desktop tile).
    pub is_large: bool,
    /// Content is a live mirrored surface rather than a snapshot.
    pub is_running_live: bool,
}

impl Tile {
    #[must_use]
    pub fn new(id: impl Into<TileId>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
            row: Row::None,
            is_large: false,
            is_running_live: false,
        }
    }

    #[must_use]
    pub fn large(mut self) -> Self {
        self.is_large = true;
        self
    }

    #[must_use]
    pub fn in_row(mut self, row: Row) -> Self {
        self.row = row;
        self
    }

    #[must_use]
    pub fn running_live(mut self) -> Self {
        self.is_running_live = true;
        self
    }
}
