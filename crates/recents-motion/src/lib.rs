#![forbid(unsafe_code)]

//! Motion: chained spring choreography for overview tiles.
//!
//! # Role in the workspace
//! `recents-motion` turns a drag release into frames. A released tile either
//! returns to rest or leaves; its neighbours follow through a chain of
//! springs, each chasing the one before it, and when a tile leaves the tiles
//! behind it reflow into the gap.
//!
//! # How it fits together
//! - [`ChainBuilder`] asks an [`ElementLocator`](recents_layout::ElementLocator)
//!   which neighbours react, producing a [`ChainPlan`].
//! - [`SpringChain`] integrates a root and its followers each tick.
//! - [`ThresholdTrigger`] decides when the root gets its kick.
//! - [`Choreographer`] owns the layout, the sink and every running
//!   orchestration, and is the only thing that mutates the layout.
//! - Every side effect leaves through a [`MotionSink`].
//!
//! # Example
//!
//! ```
//! use recents_core::Axis;
//! use recents_layout::{TileId, TileLayout, Viewport};
//! use recents_motion::testing::{RecordingSink, run_until_idle};
//! use recents_motion::{Choreographer, DragRelease, MotionConfig};
//!
//! let layout = TileLayout::uniform_carousel(5, 300.0, 500.0, Viewport::new(1_000.0));
//! let mut engine = Choreographer::new(layout, RecordingSink::new(), MotionConfig::default())?;
//!
//! engine.release(DragRelease::new(2, -300.0).dismissing());
//! run_until_idle(&mut engine, 1_000);
//!
//! assert_eq!(engine.sink().removals(), vec![TileId::new(2)]);
//! assert_eq!(engine.offset(TileId::new(3), Axis::Primary), 0.0);
//! # Ok::<(), recents_motion::ConfigError>(())
//! ```

pub mod chain;
pub mod choreographer;
pub mod config;
pub mod handle;
pub mod orchestrator;
pub mod propagator;
pub mod sink;
pub mod testing;
pub mod trigger;

pub use chain::{ChainBuilder, ChainPlan, PlannedLink, Upstream, link_params};
pub use choreographer::{Choreographer, DragRelease};
pub use config::{ConfigError, MotionConfig};
pub use handle::{OrchestrationHandle, OrchestrationId};
pub use orchestrator::{OrchestrationInfo, OrchestrationKind, Phase};
pub use propagator::{ChainLink, SpringChain};
pub use sink::{Completion, HapticIntensity, MotionSink};
pub use trigger::{ThresholdTrigger, TriggerState};
