//! Fixed arena geometry: tower anchors, halves, lanes and pockets.
//!
//! Side 0 (blue) defends the bottom half, side 1 (red) the top half. Every
//! anchor for side 1 is side 0's anchor mirrored across the river.

use crate::core::{PlayerId, Position};

/// Rows past the river a pocket opens up once a princess tower falls.
pub const POCKET_DEPTH: u32 = 4;

/// Left or right lane, named from the top-down view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Left, Lane::Right];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }
}

/// Geometry of one arena size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
}

impl Layout {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// First row of side 0's half.
    #[must_use]
    pub fn river(&self) -> u32 {
        self.height / 2
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && i64::from(x) < i64::from(self.width)
            && i64::from(y) < i64::from(self.height)
    }

    fn for_side(&self, side: PlayerId, blue: Position) -> Position {
        if side == PlayerId::BLUE {
            blue
        } else {
            blue.mirrored(f64::from(self.height))
        }
    }

    /// Centre of `side`'s king tower.
    #[must_use]
    pub fn king_anchor(&self, side: PlayerId) -> Position {
        let blue = Position::new(f64::from(self.width) / 2.0, f64::from(self.height) - 3.0);
        self.for_side(side, blue)
    }

    /// Centre of `side`'s princess tower on `lane`.
    #[must_use]
    pub fn princess_anchor(&self, side: PlayerId, lane: Lane) -> Position {
        let x = match lane {
            Lane::Left => 3.5,
            Lane::Right => f64::from(self.width) - 3.5,
        };
        self.for_side(side, Position::new(x, f64::from(self.height) - 6.5))
    }

    /// Whether the cell lies in `side`'s own half.
    #[must_use]
    pub fn in_own_half(&self, side: PlayerId, y: u32) -> bool {
        if side == PlayerId::BLUE {
            y >= self.river()
        } else {
            y < self.river()
        }
    }

    /// Lane a column belongs to.
    #[must_use]
    pub fn lane_of(&self, x: u32) -> Lane {
        if x < self.width / 2 {
            Lane::Left
        } else {
            Lane::Right
        }
    }

    /// Whether the cell is in the enemy rows `side` gains on `lane` once
    /// the enemy princess tower there falls.
    #[must_use]
    pub fn in_pocket(&self, side: PlayerId, lane: Lane, x: u32, y: u32) -> bool {
        if self.lane_of(x) != lane {
            return false;
        }
        let river = self.river();
        if side == PlayerId::BLUE {
            y < river && y + POCKET_DEPTH >= river
        } else {
            y >= river && y < river + POCKET_DEPTH
        }
    }
}

/// Whether the centre of cell `(x, y)` lies inside a square footprint of
/// half-size `radius` around `center`.
#[must_use]
pub fn footprint_covers(center: Position, radius: f64, x: u32, y: u32) -> bool {
    let cell = Position::cell_center(x, y);
    (cell.x - center.x).abs() < radius && (cell.y - center.y).abs() < radius
}
