#![forbid(unsafe_code)]

//! Layout: the tile model and the read-only queries the motion engine asks
//! of it.
//!
//! # Role in the workspace
//! The motion engine never owns views. It sees the overview as a list of
//! [`Tile`]s with geometry and classification, reachable through the
//! [`ElementLocator`] trait. Hosts implement [`LayoutStore`] over their own
//! view tree, or use [`TileLayout`] directly.
//!
//! # Modules
//! - [`tile`]: tile identity, classification, geometry.
//! - [`viewport`]: scroll position, page spacing, on-screen tests.
//! - [`locator`]: the query traits and neighbour types.
//! - [`reflow`]: the gap a removed tile leaves and which side closes it.
//! - [`layout`]: `TileLayout`, the in-crate carousel/grid implementation.

pub mod layout;
pub mod locator;
pub mod reflow;
pub mod tile;
pub mod viewport;

pub use layout::{LayoutError, TileLayout};
pub use locator::{
    Arrangement, ChainDirection, ElementLocator, LayoutStore, Neighbor, OrderMode, Removal,
    SlotPosition, TileSlot,
};
pub use reflow::ReflowGap;
pub use tile::{Row, Tile, TileId};
pub use viewport::{PageRelation, Viewport};
