//! Geometry value types and constraint helpers.
//!
//! # Responsibility
//! - Provide viewport-space points, sizes and rectangles.
//! - Provide the clamp and intersection primitives used by layout rules.
//!
//! # Invariants
//! - All functions here are pure and never fail.
//! - Coordinates are viewport pixels with the origin at the top-left corner.

use serde::{Deserialize, Serialize};

/// Pointer or top-left position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle described by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Clamps `value` into `[min, max]`.
///
/// Applied as `max(min, min(value, max))`, so when the range is inverted
/// (`min > max`, e.g. a note wider than the viewport) the lower bound wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Returns whether two rectangles overlap.
///
/// Touching edges count as intersecting.
pub fn rectangles_intersect(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.left() || a.left() > b.right() || a.bottom() < b.top() || a.top() > b.bottom())
}
