//! Bounded integer movement and proximity.
//!
//! Axes are independent: a step that would leave the field on X is dropped on
//! X only, and the Y component still applies (and vice versa). Nothing is
//! clamped to the edge; the offending delta is simply discarded.

use serde::{Deserialize, Serialize};

/// Integer field coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance. Computed in `i64` so far-apart points
    /// cannot overflow.
    pub fn distance_squared(&self, other: &Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// Field extent. Valid coordinates are `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub width: i32,
    pub height: i32,
}

impl FieldBounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        axis_in_range(pos.x, self.width) && axis_in_range(pos.y, self.height)
    }
}

fn axis_in_range(value: i32, bound: i32) -> bool {
    value >= 0 && value < bound
}

/// Apply `(dx, dy)` to `pos`, keeping each axis only if it stays in bounds.
pub fn apply_step(pos: Position, dx: i32, dy: i32, bounds: FieldBounds) -> Position {
    let mut next = pos;
    if let Some(x) = pos.x.checked_add(dx) {
        if axis_in_range(x, bounds.width) {
            next.x = x;
        }
    }
    if let Some(y) = pos.y.checked_add(dy) {
        if axis_in_range(y, bounds.height) {
            next.y = y;
        }
    }
    next
}

/// Whether `target` lies within `radius` of `origin` (inclusive).
///
/// Only the caller's radius is used; proximity between two NPCs with
/// different radii is not symmetric.
pub fn within_radius(origin: Position, target: Position, radius: i32) -> bool {
    let r = i64::from(radius);
    origin.distance_squared(&target) <= r * r
}
