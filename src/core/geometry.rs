//! Continuous arena coordinates.
//!
//! Positions are measured in tiles; `(0, 0)` is the top-left corner of the
//! arena and `y` grows towards side 0's king tower.

use serde::{Deserialize, Serialize};

/// A point on the arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Centre of the integer cell `(x, y)`.
    #[must_use]
    pub fn cell_center(x: u32, y: u32) -> Self {
        Self::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Move `travel` units along the straight line towards `goal`.
    ///
    /// Returns `self` when the two points coincide.
    #[must_use]
    pub fn toward(self, goal: Position, travel: f64) -> Position {
        let dist = self.distance(goal);
        if dist <= f64::EPSILON {
            return self;
        }
        let scale = travel / dist;
        Position::new(
            self.x + (goal.x - self.x) * scale,
            self.y + (goal.y - self.y) * scale,
        )
    }

    /// Mirror across the horizontal centre line of an arena of `height` tiles.
    #[must_use]
    pub fn mirrored(self, height: f64) -> Position {
        Position::new(self.x, height - self.y)
    }
}
