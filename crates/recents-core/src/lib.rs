#![forbid(unsafe_code)]

//! Core: spring physics, layout geometry and logging for the overview motion
//! engine.
//!
//! # Role in the workspace
//! `recents-core` is the leaf crate. It owns the damped-oscillator model that
//! every dismiss, settle and reflow animation integrates with, and the small
//! geometric vocabulary (rectangles, primary/secondary axes, reading
//! direction) shared by the layout and motion crates.
//!
//! # Primary responsibilities
//! - **Spring**: semi-implicit Euler integration of a 1-D damped harmonic
//!   oscillator, parameterised by stiffness and damping ratio.
//! - **SpringParams**: validated parameters; invalid values are rejected at
//!   construction so integration itself never fails.
//! - **Geometry**: `Rect`, `Axis`, `Orientation`, `ReadingDirection`.
//! - **Logging**: optional `tracing` re-exports.

pub mod geometry;
pub mod logging;
pub mod spring;

pub use geometry::{Axis, Orientation, ReadingDirection, Rect};
pub use spring::{Spring, SpringParams, SpringParamsError};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
