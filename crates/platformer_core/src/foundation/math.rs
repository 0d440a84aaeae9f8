//! Math utilities and types
//!
//! Provides the 2D vector alias used for positions and velocities, and the
//! integer screen rectangle used by every collision test.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type (screen space, +Y points down)
pub type Vec2 = Vector2<f32>;

/// Axis-aligned integer rectangle in screen space
///
/// `x`/`y` address the top-left corner. Edges follow the screen convention:
/// `top` is the smaller Y, `bottom` the larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Horizontal extent
    pub width: i32,
    /// Vertical extent
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Left edge (inclusive)
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Right edge (exclusive)
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Top edge (inclusive)
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge (exclusive)
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    pub const fn intersects(&self, other: &Self) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }
}

/// Truncate a float coordinate toward zero, the way screen boxes are snapped
#[allow(clippy::cast_possible_truncation)]
pub fn truncate(value: f32) -> i32 {
    value as i32
}
