//! Player actions: placing a card from the hand onto an arena cell.
//!
//! An action is either a pass (`None` at the engine boundary) or a
//! `Placement`. Coordinates are signed so that out-of-range requests can be
//! represented and rejected rather than wrapped.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Play hand slot `hand_index` onto cell `(x, y)`.
///
/// ```
/// use arena_sim::core::Placement;
///
/// let action = Placement::new(4, 20, 0);
/// assert_eq!(action.cell(), (4, 20));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub hand_index: usize,
}

impl Placement {
    #[must_use]
    pub const fn new(x: i32, y: i32, hand_index: usize) -> Self {
        Self { x, y, hand_index }
    }

    #[must_use]
    pub const fn cell(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl From<(i32, i32, usize)> for Placement {
    fn from((x, y, hand_index): (i32, i32, usize)) -> Self {
        Self::new(x, y, hand_index)
    }
}

/// An accepted placement with the frame it was applied on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,

    pub placement: Placement,

    /// Frame the placement was applied on.
    pub frame: u64,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, placement: Placement, frame: u64) -> Self {
        Self {
            player,
            placement,
            frame,
        }
    }
}
