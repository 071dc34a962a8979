#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Tiles live in a scrollable strip. The *primary* axis is the scroll axis
//! (horizontal in a portrait overview, vertical when the launcher is laid
//! out sideways); the *secondary* axis is the swipe-to-dismiss axis.

/// A rectangle in layout space (pixels, origin at the strip's top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Start coordinate along `axis` under `orientation`.
    #[inline]
    pub fn start(&self, axis: Axis, orientation: Orientation) -> f64 {
        match orientation.resolve(axis) {
            ScreenAxis::X => self.x,
            ScreenAxis::Y => self.y,
        }
    }

    /// Extent along `axis` under `orientation`.
    #[inline]
    pub fn size(&self, axis: Axis, orientation: Orientation) -> f64 {
        match orientation.resolve(axis) {
            ScreenAxis::X => self.width,
            ScreenAxis::Y => self.height,
        }
    }

    /// End coordinate (exclusive) along `axis` under `orientation`.
    #[inline]
    pub fn end(&self, axis: Axis, orientation: Orientation) -> f64 {
        self.start(axis, orientation) + self.size(axis, orientation)
    }

    /// Copy of this rectangle moved by `delta` along `axis`.
    #[must_use]
    pub fn translated(&self, axis: Axis, orientation: Orientation, delta: f64) -> Rect {
        let mut moved = *self;
        match orientation.resolve(axis) {
            ScreenAxis::X => moved.x += delta,
            ScreenAxis::Y => moved.y += delta,
        }
        moved
    }
}

/// Logical animation axis of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Scroll axis; reflow moves tiles along it.
    Primary,
    /// Dismiss axis; settle and dismiss move tiles along it.
    Secondary,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Which screen axis the primary (scroll) axis maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Primary = x, secondary = y.
    #[default]
    Horizontal,
    /// Primary = y, secondary = x.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenAxis {
    X,
    Y,
}

impl Orientation {
    const fn resolve(self, axis: Axis) -> ScreenAxis {
        match (self, axis) {
            (Self::Horizontal, Axis::Primary) | (Self::Vertical, Axis::Secondary) => ScreenAxis::X,
            (Self::Horizontal, Axis::Secondary) | (Self::Vertical, Axis::Primary) => ScreenAxis::Y,
        }
    }
}

/// Reading direction of the primary axis.
///
/// Layout order starts at the reading start: the left edge for
/// left-to-right, the right edge for right-to-left. Vertical layouts use
/// `LeftToRight` (start at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl ReadingDirection {
    /// Sign of the layout-end direction in layout coordinates.
    ///
    /// Moving a tile "toward the end" adds `end_sign() * distance` to its
    /// primary coordinate.
    #[inline]
    #[must_use]
    pub const fn end_sign(self) -> f64 {
        match self {
            Self::LeftToRight => 1.0,
            Self::RightToLeft => -1.0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::RightToLeft)
    }
}
