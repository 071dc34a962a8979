#![forbid(unsafe_code)]

//! The engine: owns the layout, the sink and every running orchestration.
//!
//! # Ownership of tiles
//!
//! A tile is written by at most one orchestration at a time. Each started
//! orchestration leases its pivot and its visible neighbours. Leasing a tile
//! that another orchestration holds takes it away from that holder: the
//! holder is cancelled outright if the tile is its running pivot, otherwise
//! it just stops writing the tile. The new orchestration picks the tile up
//! from the offsets last written, so motion stays continuous, and springs
//! any offset on an axis it does not animate back to zero.
//!
//! A tile whose dismiss is still running is never leased away. Later chains
//! keep it as a hidden link so their wave still passes through it.
//!
//! # Tick phases
//!
//! 1. Orchestrations whose handle was cancelled are reaped.
//! 2. Orchestrations step in start order; their writes reach the sink in
//!    propagation order.
//! 3. Dismissed tiles leave the layout and their reflows start.
//! 4. Completions are reported.
//!
//! The layout only changes in phase 3, after every write of the tick.
//!
//! # Failure Modes
//!
//! - Releasing a tile that is not laid out returns `None`.
//! - Releasing a tile whose dismiss is still running returns `None`.
//! - A pivot that vanishes from the layout while its driver runs abandons
//!   the orchestration ([`Completion::Abandoned`]).

use std::time::Duration;

use rustc_hash::FxHashMap;

use recents_core::{Axis, Spring, SpringParams, debug, trace, warn};
use recents_layout::{ElementLocator, LayoutStore, Removal, TileId};

use crate::chain::{ChainBuilder, ChainPlan, PlannedLink, link_params};
use crate::config::{ConfigError, MotionConfig};
use crate::handle::{OrchestrationHandle, OrchestrationId};
use crate::orchestrator::{Driver, Orchestration, OrchestrationInfo, Relaxer, TickOutput};
use crate::propagator::SpringChain;
use crate::sink::{Completion, MotionSink};
use crate::trigger::ThresholdTrigger;

/// The end of a drag gesture on a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    pub tile: TileId,
    /// Secondary-axis velocity at release, px/s.
    pub velocity: f64,
    /// Secondary-axis offset at release.
    pub displacement: f64,
    /// The gesture layer decided the tile should leave.
    pub is_dismissing: bool,
    /// Signed offset at which a dismissed tile is gone.
    pub dismiss_distance: f64,
}

impl DragRelease {
    #[must_use]
    pub fn new(tile: impl Into<TileId>, dismiss_distance: f64) -> Self {
        Self {
            tile: tile.into(),
            velocity: 0.0,
            displacement: 0.0,
            is_dismissing: false,
            dismiss_distance,
        }
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_displacement(mut self, displacement: f64) -> Self {
        self.displacement = displacement;
        self
    }

    #[must_use]
    pub fn dismissing(mut self) -> Self {
        self.is_dismissing = true;
        self
    }

    /// `+1` or `-1`: the way a dismissed tile travels.
    #[must_use]
    pub fn dismiss_sign(&self) -> f64 {
        if self.dismiss_distance != 0.0 {
            self.dismiss_distance.signum()
        } else if self.displacement != 0.0 {
            self.displacement.signum()
        } else {
            1.0
        }
    }

    /// Whether the release leads to a dismissal rather than a return.
    #[must_use]
    pub fn resolves_to_dismiss(&self) -> bool {
        self.is_dismissing
            || (self.dismiss_distance != 0.0
                && self.displacement * self.dismiss_sign() >= self.dismiss_distance.abs())
    }

    /// Cascade seed when a trigger fires without a crossing: the release
    /// velocity, floored at `min_velocity` in magnitude.
    #[must_use]
    pub fn cascade_seed(&self, min_velocity: f64) -> f64 {
        let sign = if self.velocity != 0.0 {
            self.velocity.signum()
        } else {
            self.dismiss_sign()
        };
        sign * self.velocity.abs().max(min_velocity)
    }
}

/// Drives every dismiss, settle and reflow animation of one layout.
#[derive(Debug)]
pub struct Choreographer<L, S> {
    layout: L,
    sink: S,
    config: MotionConfig,
    dismiss_params: SpringParams,
    reflow_params: SpringParams,
    orchestrations: Vec<Orchestration>,
    leases: FxHashMap<TileId, OrchestrationId>,
    offsets: FxHashMap<(TileId, Axis), f64>,
    next_generation: u64,
    scratch: TickOutput,
}

impl<L: LayoutStore, S: MotionSink> Choreographer<L, S> {
    /// Validate `config` and take ownership of the layout and sink.
    pub fn new(layout: L, sink: S, config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dismiss_params = config.dismiss_params()?;
        let reflow_params = config.reflow_params()?;
        Ok(Self {
            layout,
            sink,
            config,
            dismiss_params,
            reflow_params,
            orchestrations: Vec::new(),
            leases: FxHashMap::default(),
            offsets: FxHashMap::default(),
            next_generation: 1,
            scratch: TickOutput::default(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Host-side layout edits. Removing a tile that an orchestration is
    /// driving abandons that orchestration on the next tick.
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn into_parts(self) -> (L, S) {
        (self.layout, self.sink)
    }

    /// Last offset written for `tile` on `axis`.
    #[must_use]
    pub fn offset(&self, tile: TileId, axis: Axis) -> f64 {
        self.offsets.get(&(tile, axis)).copied().unwrap_or(0.0)
    }

    /// No orchestration is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.orchestrations.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = OrchestrationInfo> + '_ {
        self.orchestrations.iter().map(Orchestration::info)
    }

    /// A handle for a running orchestration, e.g. a reflow started by a
    /// dismiss.
    #[must_use]
    pub fn handle(&self, id: OrchestrationId) -> Option<OrchestrationHandle> {
        self.orchestrations
            .iter()
            .find(|orch| orch.id() == id)
            .map(|orch| orch.handle().clone())
    }

    /// The orchestration currently allowed to write `tile`.
    #[must_use]
    pub fn holder_of(&self, tile: TileId) -> Option<OrchestrationId> {
        self.leases.get(&tile).copied()
    }

    // -----------------------------------------------------------------------
    // Starting
    // -----------------------------------------------------------------------

    /// Start a settle or dismiss for a released tile.
    pub fn release(&mut self, release: DragRelease) -> Option<OrchestrationHandle> {
        self.reap_cancelled();
        let pivot = release.tile;
        if !self.layout.contains(pivot) {
            debug!(tile = %pivot, "release ignored: tile not laid out");
            return None;
        }
        if self.is_removing(pivot) {
            warn!(tile = %pivot, "release ignored: tile is mid-removal");
            return None;
        }

        let dismissing = release.resolves_to_dismiss();
        let mut plan = ChainBuilder::new(&self.layout).settle_plan(pivot);
        self.hide_removing(&mut plan);
        let handle = self.next_handle();
        let id = handle.id();

        let mut claimed = vec![pivot];
        claimed.extend(plan.visible_tiles());
        self.claim(id, &claimed);

        let live = self.layout.is_running_live(pivot);
        let target = if dismissing { release.dismiss_distance } else { 0.0 };
        let spring = self
            .spring(self.dismiss_params, release.displacement, target)
            .with_velocity(release.velocity);
        let driver = if dismissing {
            Driver::dismissing(pivot, Axis::Secondary, spring, live, release.dismiss_distance)
        } else {
            Driver::returning(pivot, Axis::Secondary, spring, live)
        };

        let root = self.resting_spring(self.dismiss_params, 0.0);
        let chain = self.build_chain(Axis::Secondary, root, &plan, self.dismiss_params, 0.0);

        let seed = release.cascade_seed(self.config.min_settle_velocity);
        let trigger = if plan.is_empty() {
            None
        } else if dismissing {
            Some(ThresholdTrigger::immediate(seed))
        } else {
            Some(ThresholdTrigger::new(
                0.0,
                release.displacement,
                release.dismiss_sign(),
                seed,
            ))
        };

        let mut orch = Orchestration::driven(
            handle.clone(),
            driver,
            chain,
            trigger,
            self.config.haptic_full_scale_velocity,
        );
        self.add_relaxers(&mut orch, &claimed, Axis::Primary);

        debug!(
            id = %id,
            kind = ?orch.kind(),
            pivot = %pivot,
            links = plan.len(),
            velocity = release.velocity,
            "orchestration started"
        );
        self.orchestrations.push(orch);
        Some(handle)
    }

    /// Start the reflow that closes a removal's gap.
    ///
    /// Called internally when a dismiss removes its tile; hosts that remove
    /// tiles through [`LayoutStore::remove_tile`] themselves may call it
    /// directly. Returns `None` when nothing moves.
    pub fn start_reflow(&mut self, removal: &Removal) -> Option<OrchestrationHandle> {
        self.reap_cancelled();
        if removal.gap.is_degenerate() {
            debug!(tile = %removal.slot.tile.id, "reflow skipped: zero gap");
            return None;
        }
        let mut plan = ChainBuilder::new(&self.layout).reflow_plan(removal);
        if plan.is_empty() {
            debug!(tile = %removal.slot.tile.id, "reflow skipped: nothing moves");
            return None;
        }

        self.hide_removing(&mut plan);
        let handle = self.next_handle();
        let id = handle.id();
        let claimed: Vec<TileId> = plan.visible_tiles().collect();
        self.claim(id, &claimed);

        let start = removal.gap.start_offset();
        let root = self.spring(self.reflow_params, start, 0.0);
        let chain = self.build_chain(Axis::Primary, root, &plan, self.reflow_params, start);

        // Compensate the base-position jump before the next frame is drawn.
        for link in chain.emitting() {
            self.write(link.tile(), Axis::Primary, link.value(), link.is_live());
        }

        let trigger = ThresholdTrigger::new(0.0, start, start.signum(), self.config.min_settle_velocity);
        let mut orch = Orchestration::reflow(
            handle.clone(),
            chain,
            trigger,
            self.config.haptic_full_scale_velocity,
        );
        self.add_relaxers(&mut orch, &claimed, Axis::Secondary);

        debug!(
            id = %id,
            removed = %removal.slot.tile.id,
            gap = removal.gap.distance,
            synthetic_page = removal.gap.synthetic_page,
            links = plan.len(),
            "reflow started"
        );
        self.orchestrations.push(orch);
        Some(handle)
    }

    // -----------------------------------------------------------------------
    // Cancelling
    // -----------------------------------------------------------------------

    /// Cancel now. Offsets stay where they are and no pending haptic plays.
    /// Returns `false` for a finished or stale handle.
    pub fn cancel(&mut self, handle: &OrchestrationHandle) -> bool {
        handle.cancel();
        match self.index_of(handle.id()) {
            Some(index) => {
                self.finish(index, Completion::Cancelled);
                true
            }
            None => false,
        }
    }

    /// Cancel everything that is running.
    pub fn cancel_all(&mut self) {
        while !self.orchestrations.is_empty() {
            let last = self.orchestrations.len() - 1;
            self.finish(last, Completion::Cancelled);
        }
    }

    // -----------------------------------------------------------------------
    // Ticking
    // -----------------------------------------------------------------------

    /// Advance every running orchestration by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.reap_cancelled();

        let mut removals = Vec::new();
        let mut completions = Vec::new();
        let mut out = std::mem::take(&mut self.scratch);

        for orch in &mut self.orchestrations {
            out.clear();
            let id = orch.id();
            if let Some(pivot) = orch.running_pivot() {
                if !self.layout.contains(pivot) {
                    debug!(id = %id, tile = %pivot, "pivot left the layout; abandoning");
                    completions.push((id, Completion::Abandoned));
                    continue;
                }
            }

            orch.tick(dt, &mut out);
            apply(&mut self.sink, &mut self.offsets, &self.leases, id, &out);

            if let Some(tile) = out.removal {
                removals.push((id, tile));
            }
            if let Some(completion) = out.completion {
                completions.push((id, completion));
            }
        }
        out.clear();
        self.scratch = out;

        for (id, tile) in removals {
            self.remove_dismissed(id, tile);
        }
        for (id, completion) in completions {
            if let Some(index) = self.index_of(id) {
                self.finish(index, completion);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn next_handle(&mut self) -> OrchestrationHandle {
        let id = OrchestrationId::new(self.next_generation);
        self.next_generation += 1;
        OrchestrationHandle::new(id)
    }

    fn index_of(&self, id: OrchestrationId) -> Option<usize> {
        self.orchestrations.iter().position(|orch| orch.id() == id)
    }

    fn spring(&self, params: SpringParams, position: f64, target: f64) -> Spring {
        Spring::new(params, position, target)
            .with_rest_thresholds(self.config.rest_displacement, self.config.rest_velocity)
    }

    fn resting_spring(&self, params: SpringParams, position: f64) -> Spring {
        Spring::resting(params, position)
            .with_rest_thresholds(self.config.rest_displacement, self.config.rest_velocity)
    }

    /// Whether `tile` is the pivot of a dismiss that has not removed it yet.
    fn is_removing(&self, tile: TileId) -> bool {
        self.orchestrations.iter().any(|orch| orch.is_removing(tile))
    }

    /// Turn links over mid-removal tiles into hidden ones.
    fn hide_removing(&self, plan: &mut ChainPlan) {
        for link in plan.toward_start.iter_mut().chain(plan.toward_end.iter_mut()) {
            if link.visible && self.is_removing(link.tile) {
                trace!(tile = %link.tile, "mid-removal tile kept as hidden link");
                link.visible = false;
            }
        }
    }

    /// Visible followers start from the tile's last written offset plus
    /// `shift`; hidden ones start at `shift`.
    fn build_chain(
        &self,
        axis: Axis,
        root: Spring,
        plan: &ChainPlan,
        base: SpringParams,
        shift: f64,
    ) -> SpringChain {
        let extra = self.config.additional_neighbor_damping;
        let layout = &self.layout;
        SpringChain::from_plan(
            axis,
            root,
            plan,
            |planned: &PlannedLink| {
                let start = if planned.visible {
                    self.offset(planned.tile, axis) + shift
                } else {
                    shift
                };
                self.resting_spring(link_params(base, planned.offset, extra), start)
            },
            |tile| layout.is_running_live(tile),
        )
    }

    fn add_relaxers(&self, orch: &mut Orchestration, tiles: &[TileId], axis: Axis) {
        let params = match axis {
            Axis::Primary => self.reflow_params,
            Axis::Secondary => self.dismiss_params,
        };
        for &tile in tiles {
            let offset = self.offset(tile, axis);
            if offset == 0.0 {
                continue;
            }
            orch.add_relaxer(Relaxer {
                tile,
                axis,
                spring: self.spring(params, offset, 0.0),
                live: self.layout.is_running_live(tile),
            });
        }
    }

    /// Lease `tiles` to `id`, taking them from their current holders.
    fn claim(&mut self, id: OrchestrationId, tiles: &[TileId]) {
        for &tile in tiles {
            let Some(holder) = self.leases.insert(tile, id) else {
                continue;
            };
            if holder == id {
                continue;
            }
            let Some(index) = self.index_of(holder) else {
                continue;
            };
            if self.orchestrations[index].running_pivot() == Some(tile) {
                debug!(id = %holder, by = %id, tile = %tile, "pivot claimed; cancelling");
                self.finish(index, Completion::Cancelled);
            } else {
                trace!(id = %holder, by = %id, tile = %tile, "tile handed over");
                self.orchestrations[index].detach(tile);
            }
        }
    }

    fn write(&mut self, tile: TileId, axis: Axis, value: f64, live: bool) {
        self.sink.set_offset(tile, axis, value);
        self.offsets.insert((tile, axis), value);
        if live {
            self.sink.set_live_transform(tile, axis, value);
            self.sink.request_redraw(tile);
        }
    }

    fn remove_dismissed(&mut self, id: OrchestrationId, tile: TileId) {
        if self.leases.get(&tile) == Some(&id) {
            self.leases.remove(&tile);
        }
        let Some(removal) = self.layout.remove_tile(tile) else {
            warn!(id = %id, tile = %tile, "dismissed tile already gone");
            return;
        };
        self.offsets.remove(&(tile, Axis::Primary));
        self.offsets.remove(&(tile, Axis::Secondary));
        self.sink.remove_tile(tile, true);
        debug!(id = %id, tile = %tile, gap = removal.gap.distance, "tile removed");
        self.start_reflow(&removal);
    }

    fn reap_cancelled(&mut self) {
        while let Some(index) = self
            .orchestrations
            .iter()
            .position(|orch| orch.handle().is_cancelled())
        {
            self.finish(index, Completion::Cancelled);
        }
    }

    fn finish(&mut self, index: usize, completion: Completion) {
        let orch = self.orchestrations.remove(index);
        let id = orch.id();
        self.leases.retain(|_, holder| *holder != id);
        orch.handle().mark_finished();
        debug!(id = %id, ?completion, "orchestration finished");
        self.sink.on_complete(id, completion);
    }
}

/// Apply one orchestration's writes and haptics, skipping tiles it no
/// longer holds.
fn apply<S: MotionSink>(
    sink: &mut S,
    offsets: &mut FxHashMap<(TileId, Axis), f64>,
    leases: &FxHashMap<TileId, OrchestrationId>,
    id: OrchestrationId,
    out: &TickOutput,
) {
    for write in &out.writes {
        if leases.get(&write.tile) != Some(&id) {
            continue;
        }
        sink.set_offset(write.tile, write.axis, write.value);
        offsets.insert((write.tile, write.axis), write.value);
        if write.live {
            sink.set_live_transform(write.tile, write.axis, write.value);
            sink.request_redraw(write.tile);
        }
    }
    for &intensity in &out.haptics {
        sink.play_settle_haptic(intensity);
    }
}
