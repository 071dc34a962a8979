#![forbid(unsafe_code)]

//! Spring chains: a root spring and followers that chase it.
//!
//! Each tick the root integrates first, then every link in construction
//! order takes its upstream spring's freshly integrated value as its new
//! target and integrates. Coupling is synchronous: a follower never sees its
//! upstream's value from the previous tick.

use std::time::Duration;

use recents_core::{Axis, Spring};
use recents_layout::{ChainDirection, TileId};

use crate::chain::{ChainPlan, PlannedLink, Upstream};

/// A follower spring bound to a tile.
#[derive(Debug, Clone)]
pub struct ChainLink {
    tile: TileId,
    direction: ChainDirection,
    offset: u32,
    /// Index into the chain's flattened link list.
    upstream: Upstream,
    visible: bool,
    live: bool,
    detached: bool,
    spring: Spring,
}

impl ChainLink {
    #[inline]
    #[must_use]
    pub fn tile(&self) -> TileId {
        self.tile
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> ChainDirection {
        self.direction
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn upstream(&self) -> Upstream {
        self.upstream
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.spring.position()
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.spring.target()
    }

    #[inline]
    #[must_use]
    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Written to the sink: visible and still owned by this chain.
    #[inline]
    #[must_use]
    pub fn is_emitting(&self) -> bool {
        self.visible && !self.detached
    }

    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }
}

/// A root spring and its followers, flattened toward-start first.
#[derive(Debug, Clone)]
pub struct SpringChain {
    axis: Axis,
    root: Spring,
    links: Vec<ChainLink>,
}

impl SpringChain {
    /// Build from a plan. `spring_for` creates each link's spring; `is_live`
    /// tells which tiles mirror their offsets into a live surface.
    pub fn from_plan(
        axis: Axis,
        root: Spring,
        plan: &ChainPlan,
        mut spring_for: impl FnMut(&PlannedLink) -> Spring,
        is_live: impl Fn(TileId) -> bool,
    ) -> Self {
        let mut links = Vec::with_capacity(plan.len());
        for direction in ChainDirection::BOTH {
            let base = links.len();
            for planned in plan.side(direction) {
                let upstream = match planned.upstream {
                    Upstream::Root => Upstream::Root,
                    Upstream::Link(index) => Upstream::Link(base + index),
                };
                links.push(ChainLink {
                    tile: planned.tile,
                    direction,
                    offset: planned.offset,
                    upstream,
                    visible: planned.visible,
                    live: is_live(planned.tile),
                    detached: false,
                    spring: spring_for(planned),
                });
            }
        }
        Self { axis, root, links }
    }

    #[inline]
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Spring {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Spring {
        &mut self.root
    }

    #[inline]
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.root.is_at_rest() && self.links.iter().all(|link| link.spring.is_at_rest())
    }

    /// Stop emitting for `tile`. The link keeps integrating so links behind
    /// it still follow. Returns whether the tile was in the chain.
    pub fn detach(&mut self, tile: TileId) -> bool {
        let mut found = false;
        for link in self.links.iter_mut().filter(|link| link.tile == tile) {
            link.detached = true;
            found = true;
        }
        found
    }

    /// Advance root then every link, in order.
    pub fn step(&mut self, dt: Duration) {
        self.root.advance(dt);
        for index in 0..self.links.len() {
            let target = match self.links[index].upstream {
                Upstream::Link(up) if up < index => self.links[up].spring.position(),
                _ => self.root.position(),
            };
            let spring = &mut self.links[index].spring;
            spring.set_target(target);
            spring.advance(dt);
        }
    }

    /// Links to write this tick, in propagation order.
    pub fn emitting(&self) -> impl Iterator<Item = &ChainLink> + '_ {
        self.links.iter().filter(|link| link.is_emitting())
    }
}
