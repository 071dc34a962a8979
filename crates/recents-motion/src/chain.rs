#![forbid(unsafe_code)]

//! Which neighbours react to a pivot, in what order, and how strongly.
//!
//! A plan has two sides, toward the start and toward the end of the layout
//! in reading order. Each side lists its links nearest first; every link
//! names the spring that drives it, which is either the chain root or an
//! earlier link on the same side.
//!
//! # Invariants
//!
//! 1. A tile appears at most once in a plan, and never the pivot.
//! 2. Offsets strictly grow along every upstream path.
//! 3. A link's upstream always precedes it on its side.
//! 4. Hidden links stay in the plan so the wave keeps travelling through
//!    them; they are just never written.

use rustc_hash::FxHashSet;

use recents_core::SpringParams;
use recents_layout::{ChainDirection, ElementLocator, Removal, Row, TileId};

/// The spring a link follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// The chain's root spring.
    Root,
    /// An earlier link, by index within the same sequence.
    Link(usize),
}

/// One neighbour in a chain plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedLink {
    pub tile: TileId,
    /// Visual distance from the pivot; scales the link's extra damping.
    pub offset: u32,
    pub upstream: Upstream,
    /// Whether the tile is on screen for any part of the motion.
    pub visible: bool,
}

/// Both fan-out sides of a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainPlan {
    pub toward_start: Vec<PlannedLink>,
    pub toward_end: Vec<PlannedLink>,
}

impl ChainPlan {
    #[must_use]
    pub fn side(&self, direction: ChainDirection) -> &[PlannedLink] {
        match direction {
            ChainDirection::TowardStart => &self.toward_start,
            ChainDirection::TowardEnd => &self.toward_end,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toward_start.len() + self.toward_end.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toward_start.is_empty() && self.toward_end.is_empty()
    }

    /// `(tile, offset)` pairs of one side.
    #[must_use]
    pub fn offsets(&self, direction: ChainDirection) -> Vec<(TileId, u32)> {
        self.side(direction)
            .iter()
            .map(|link| (link.tile, link.offset))
            .collect()
    }

    /// `(tile, offset)` pairs of one side that will actually be written.
    #[must_use]
    pub fn visible_offsets(&self, direction: ChainDirection) -> Vec<(TileId, u32)> {
        self.side(direction)
            .iter()
            .filter(|link| link.visible)
            .map(|link| (link.tile, link.offset))
            .collect()
    }

    pub fn visible_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.toward_start
            .iter()
            .chain(&self.toward_end)
            .filter(|link| link.visible)
            .map(|link| link.tile)
    }
}

/// Damping for a link `offset` steps away from the pivot.
#[must_use]
pub fn link_params(base: SpringParams, offset: u32, additional_damping: f64) -> SpringParams {
    base.with_additional_damping(f64::from(offset) * additional_damping)
}

/// Builds chain plans from layout queries.
#[derive(Debug)]
pub struct ChainBuilder<'a, L: ?Sized> {
    locator: &'a L,
}

impl<'a, L: ElementLocator + ?Sized> ChainBuilder<'a, L> {
    #[must_use]
    pub fn new(locator: &'a L) -> Self {
        Self { locator }
    }

    /// Neighbours that follow a released or dismissed pivot.
    ///
    /// An absent pivot yields an empty plan.
    #[must_use]
    pub fn settle_plan(&self, pivot: TileId) -> ChainPlan {
        let mut seen = FxHashSet::default();
        seen.insert(pivot);
        let mut plan = ChainPlan::default();
        for direction in ChainDirection::BOTH {
            let side = match direction {
                ChainDirection::TowardStart => &mut plan.toward_start,
                ChainDirection::TowardEnd => &mut plan.toward_end,
            };
            for neighbor in self.locator.adjacent_tiles(pivot, direction) {
                if !seen.insert(neighbor.id) {
                    continue;
                }
                let upstream = nearest_closer(side, neighbor.offset);
                side.push(PlannedLink {
                    tile: neighbor.id,
                    offset: neighbor.offset,
                    upstream,
                    visible: self.locator.is_on_screen(neighbor.id, 0.0),
                });
            }
        }
        plan
    }

    /// Tiles that close the gap of a removal, queried after the removal.
    ///
    /// Only the moving side is populated. When the removed tile was the sole
    /// large tile of a grid, both rows follow as a second stage on the
    /// toward-end side, each row's first tile driven by the last first-stage
    /// link.
    #[must_use]
    pub fn reflow_plan(&self, removal: &Removal) -> ChainPlan {
        let gap = removal.gap.distance;
        let mut seen = FxHashSet::default();
        seen.insert(removal.slot.tile.id);

        let mut links = Vec::new();
        let first_stage = self
            .locator
            .vacated_neighbors(removal.slot.position, removal.gap.moving);
        for tile in first_stage {
            if !seen.insert(tile) {
                continue;
            }
            let offset = links.len() as u32 + 1;
            let upstream = previous(&links);
            links.push(self.reflow_link(tile, offset, upstream, gap));
        }

        if removal.sole_large {
            let stage_root = previous(&links);
            let base_offset = links.last().map_or(0, |link: &PlannedLink| link.offset);
            for row in [Row::Top, Row::Bottom] {
                let mut upstream = stage_root;
                let mut step = 0;
                for tile in self.locator.row_tiles(row) {
                    if !seen.insert(tile) {
                        continue;
                    }
                    step += 1;
                    let index = links.len();
                    links.push(self.reflow_link(tile, base_offset + step, upstream, gap));
                    upstream = Upstream::Link(index);
                }
            }
        }

        match removal.gap.moving {
            ChainDirection::TowardStart => ChainPlan {
                toward_start: links,
                toward_end: Vec::new(),
            },
            ChainDirection::TowardEnd => ChainPlan {
                toward_start: Vec::new(),
                toward_end: links,
            },
        }
    }

    fn reflow_link(&self, tile: TileId, offset: u32, upstream: Upstream, gap: f64) -> PlannedLink {
        let visible =
            self.locator.is_on_screen(tile, 0.0) || self.locator.is_on_screen(tile, -gap);
        PlannedLink {
            tile,
            offset,
            upstream,
            visible,
        }
    }
}

/// The last link strictly closer to the pivot than `offset`. Tiles sharing a
/// grid column follow the same spring.
fn nearest_closer(links: &[PlannedLink], offset: u32) -> Upstream {
    links
        .iter()
        .rposition(|link| link.offset < offset)
        .map_or(Upstream::Root, Upstream::Link)
}

fn previous(links: &[PlannedLink]) -> Upstream {
    match links.len() {
        0 => Upstream::Root,
        n => Upstream::Link(n - 1),
    }
}
