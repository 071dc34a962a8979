#![forbid(unsafe_code)]

//! One orchestration: a driver, a chain, a trigger, and the rules that tie
//! them together over time.
//!
//! An orchestration is pure state. Each tick it integrates its springs and
//! appends what should happen to a [`TickOutput`]; the
//! [`Choreographer`](crate::Choreographer) applies writes, plays haptics,
//! removes tiles and reports completion.
//!
//! # Tick order
//!
//! - Settle and dismiss: driver, trigger, chain, relaxers.
//! - Reflow: chain, trigger, relaxers. The chain root is the driver.
//!
//! # Invariants
//!
//! 1. A stopped driver is never written again.
//! 2. A dismiss requests removal exactly once, on the first tick its driver
//!    reaches the dismiss distance on the dismiss side.
//! 3. Completion is reported on exactly one tick.

use std::time::Duration;

use recents_core::{Axis, Spring, trace};
use recents_layout::TileId;

use crate::handle::{OrchestrationHandle, OrchestrationId};
use crate::propagator::SpringChain;
use crate::sink::{Completion, HapticIntensity};
use crate::trigger::ThresholdTrigger;

/// What an orchestration animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrchestrationKind {
    /// Released tile returning to rest.
    Settle,
    /// Released tile leaving the layout.
    Dismiss,
    /// Tiles closing a removed tile's gap.
    Reflow,
}

impl OrchestrationKind {
    #[must_use]
    pub fn completion(self) -> Completion {
        match self {
            Self::Settle => Completion::Settled,
            Self::Dismiss => Completion::Dismissed,
            Self::Reflow => Completion::Reflowed,
        }
    }
}

/// Lifecycle position of an orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Returning,
    Dismissing,
    Reflowing,
    Settled,
}

/// Snapshot of a running orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestrationInfo {
    pub id: OrchestrationId,
    pub kind: OrchestrationKind,
    pub phase: Phase,
    /// The released tile; `None` for reflows.
    pub pivot: Option<TileId>,
    pub links: usize,
}

// ---------------------------------------------------------------------------
// Tick output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OffsetWrite {
    pub tile: TileId,
    pub axis: Axis,
    pub value: f64,
    pub live: bool,
}

/// Side effects produced by one orchestration in one tick.
#[derive(Debug, Default)]
pub(crate) struct TickOutput {
    pub writes: Vec<OffsetWrite>,
    pub haptics: Vec<HapticIntensity>,
    pub removal: Option<TileId>,
    pub completion: Option<Completion>,
}

impl TickOutput {
    pub fn clear(&mut self) {
        self.writes.clear();
        self.haptics.clear();
        self.removal = None;
        self.completion = None;
    }

    fn write(&mut self, tile: TileId, axis: Axis, value: f64, live: bool) {
        self.writes.push(OffsetWrite {
            tile,
            axis,
            value,
            live,
        });
    }
}

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

/// The spring following the user's gesture after release.
#[derive(Debug, Clone)]
pub(crate) struct Driver {
    tile: TileId,
    axis: Axis,
    spring: Spring,
    live: bool,
    /// Dismiss distance; `None` when returning to rest.
    end: Option<f64>,
    stopped: bool,
}

impl Driver {
    pub fn returning(tile: TileId, axis: Axis, spring: Spring, live: bool) -> Self {
        Self {
            tile,
            axis,
            spring,
            live,
            end: None,
            stopped: false,
        }
    }

    pub fn dismissing(tile: TileId, axis: Axis, spring: Spring, live: bool, distance: f64) -> Self {
        Self {
            end: Some(distance),
            ..Self::returning(tile, axis, spring, live)
        }
    }
}

/// Brings an offset on an axis the orchestration does not animate back to
/// zero.
#[derive(Debug, Clone)]
pub(crate) struct Relaxer {
    pub tile: TileId,
    pub axis: Axis,
    pub spring: Spring,
    pub live: bool,
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct Orchestration {
    id: OrchestrationId,
    handle: OrchestrationHandle,
    kind: OrchestrationKind,
    phase: Phase,
    driver: Option<Driver>,
    chain: SpringChain,
    trigger: Option<ThresholdTrigger>,
    relaxers: Vec<Relaxer>,
    haptic_full_scale: f64,
}

impl Orchestration {
    pub fn driven(
        handle: OrchestrationHandle,
        driver: Driver,
        chain: SpringChain,
        trigger: Option<ThresholdTrigger>,
        haptic_full_scale: f64,
    ) -> Self {
        let (kind, phase) = if driver.end.is_some() {
            (OrchestrationKind::Dismiss, Phase::Dismissing)
        } else {
            (OrchestrationKind::Settle, Phase::Returning)
        };
        Self {
            id: handle.id(),
            handle,
            kind,
            phase,
            driver: Some(driver),
            chain,
            trigger,
            relaxers: Vec::new(),
            haptic_full_scale,
        }
    }

    pub fn reflow(
        handle: OrchestrationHandle,
        chain: SpringChain,
        trigger: ThresholdTrigger,
        haptic_full_scale: f64,
    ) -> Self {
        Self {
            id: handle.id(),
            handle,
            kind: OrchestrationKind::Reflow,
            phase: Phase::Reflowing,
            driver: None,
            chain,
            trigger: Some(trigger),
            relaxers: Vec::new(),
            haptic_full_scale,
        }
    }

    pub fn add_relaxer(&mut self, relaxer: Relaxer) {
        self.relaxers.push(relaxer);
    }

    #[inline]
    pub fn id(&self) -> OrchestrationId {
        self.id
    }

    #[inline]
    pub fn handle(&self) -> &OrchestrationHandle {
        &self.handle
    }

    #[inline]
    pub fn kind(&self) -> OrchestrationKind {
        self.kind
    }

    pub fn info(&self) -> OrchestrationInfo {
        OrchestrationInfo {
            id: self.id,
            kind: self.kind,
            phase: self.phase,
            pivot: self.driver.as_ref().map(|driver| driver.tile),
            links: self.chain.links().len(),
        }
    }

    pub fn chain(&self) -> &SpringChain {
        &self.chain
    }

    /// The pivot while its driver still runs.
    pub fn running_pivot(&self) -> Option<TileId> {
        self.driver
            .as_ref()
            .filter(|driver| !driver.stopped)
            .map(|driver| driver.tile)
    }

    /// A dismiss whose tile has not left yet.
    pub fn is_removing(&self, tile: TileId) -> bool {
        self.kind == OrchestrationKind::Dismiss && self.running_pivot() == Some(tile)
    }

    /// Stop writing `tile`. Springs keep integrating.
    pub fn detach(&mut self, tile: TileId) {
        self.chain.detach(tile);
        self.relaxers.retain(|relaxer| relaxer.tile != tile);
    }

    pub fn tick(&mut self, dt: Duration, out: &mut TickOutput) {
        match self.kind {
            OrchestrationKind::Settle | OrchestrationKind::Dismiss => self.tick_driven(dt, out),
            OrchestrationKind::Reflow => self.tick_reflow(dt, out),
        }

        for relaxer in &mut self.relaxers {
            let (value, _) = relaxer.spring.step(dt);
            out.write(relaxer.tile, relaxer.axis, value, relaxer.live);
        }

        if self.is_resolved() {
            self.phase = Phase::Settled;
            out.completion = Some(self.kind.completion());
        }
    }

    fn tick_driven(&mut self, dt: Duration, out: &mut TickOutput) {
        let chain_empty = self.chain.is_empty();
        if let Some(driver) = self.driver.as_mut().filter(|driver| !driver.stopped) {
            let (value, velocity) = driver.spring.step(dt);
            out.write(driver.tile, driver.axis, value, driver.live);

            if let Some(seed) = self
                .trigger
                .as_mut()
                .and_then(|trigger| trigger.observe(value, velocity))
            {
                trace!(id = %self.id, seed, "cascade triggered");
                self.chain.root_mut().launch(seed);
                out.haptics
                    .push(HapticIntensity::from_velocity(seed, self.haptic_full_scale));
            }

            match driver.end {
                Some(end) if value * end.signum() >= end.abs() => {
                    driver.stopped = true;
                    out.removal = Some(driver.tile);
                    if chain_empty {
                        out.haptics.push(HapticIntensity::FULL);
                    }
                }
                None if driver.spring.is_at_rest() => {
                    driver.stopped = true;
                    out.haptics.push(HapticIntensity::FULL);
                }
                _ => {}
            }
        }

        self.chain.step(dt);
        for link in self.chain.emitting() {
            out.write(link.tile(), self.chain.axis(), link.value(), link.is_live());
        }
    }

    fn tick_reflow(&mut self, dt: Duration, out: &mut TickOutput) {
        self.chain.step(dt);
        for link in self.chain.emitting() {
            out.write(link.tile(), self.chain.axis(), link.value(), link.is_live());
        }

        let root = self.chain.root();
        let (value, velocity) = (root.position(), root.velocity());
        if let Some(seed) = self
            .trigger
            .as_mut()
            .and_then(|trigger| trigger.observe(value, velocity))
        {
            trace!(id = %self.id, seed, "reflow landed");
            out.haptics
                .push(HapticIntensity::from_velocity(seed, self.haptic_full_scale));
        }
    }

    fn is_resolved(&self) -> bool {
        let driver_done = self.driver.as_ref().is_none_or(|driver| driver.stopped);
        driver_done
            && self.chain.is_at_rest()
            && self.relaxers.iter().all(|relaxer| relaxer.spring.is_at_rest())
    }
}
