#![forbid(unsafe_code)]

//! Public facade for the overview motion engine.
//!
//! Re-exports the types a host needs from the internal crates and offers a
//! prelude. A host supplies a [`LayoutStore`] over its tiles and a
//! [`MotionSink`] over its views, builds a [`Choreographer`] with
//! [`engine`], forwards drag releases and ticks it once per frame.
//!
//! ```
//! use recents::motion::testing::RecordingSink;
//! use recents::prelude::*;
//!
//! let layout = TileLayout::uniform_carousel(3, 300.0, 500.0, Viewport::new(1_200.0));
//! let mut engine = recents::engine(layout, RecordingSink::new(), MotionConfig::default())?;
//! let handle = engine.release(DragRelease::new(1, -300.0).with_displacement(-40.0));
//! assert!(handle.is_some());
//! # Ok::<(), recents::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use recents_core::{Axis, Orientation, ReadingDirection, Rect, Spring, SpringParams};

// --- Layout re-exports -----------------------------------------------------

pub use recents_layout::{
    ChainDirection, ElementLocator, LayoutError, LayoutStore, Removal, Row, Tile, TileId,
    TileLayout, Viewport,
};

// --- Motion re-exports -----------------------------------------------------

pub use recents_motion::{
    Choreographer, Completion, ConfigError, DragRelease, HapticIntensity, MotionConfig,
    MotionSink, OrchestrationHandle, OrchestrationId, OrchestrationInfo, OrchestrationKind,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spring(#[from] recents_core::SpringParamsError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Standard result type for facade APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Validate `config` and build an engine over `layout` and `sink`.
pub fn engine<L: LayoutStore, S: MotionSink>(
    layout: L,
    sink: S,
    config: MotionConfig,
) -> Result<Choreographer<L, S>> {
    Ok(Choreographer::new(layout, sink, config)?)
}

/// Install JSON logging on stderr, filtered by `RUST_LOG`.
#[cfg(feature = "tracing-json")]
pub fn init_logging() -> bool {
    recents_core::logging::init_json()
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Axis, Choreographer, Completion, DragRelease, ElementLocator, Error, LayoutStore,
        MotionConfig, MotionSink, Result, Tile, TileId, TileLayout, Viewport,
    };

    pub use crate::{core, layout, motion};
}

pub use recents_core as core;
pub use recents_layout as layout;
pub use recents_motion as motion;
