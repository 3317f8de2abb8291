//! Rules engine trait for match drivers.
//!
//! Drivers (training loops, replays, bindings) talk to a match through
//! `RulesEngine`:
//! - What placements are legal
//! - How actions and time modify the match
//! - Win/loss conditions

use serde::{Deserialize, Serialize};

use super::mask::ActionMask;
use crate::core::{EngineConfig, Placement, PlayerId, Result};

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }

    /// Winning side index, or -1 for a draw.
    #[must_use]
    pub fn value(&self) -> i32 {
        match self {
            GameResult::Winner(p) => p.index() as i32,
            GameResult::Draw => -1,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Winner(p) => write!(f, "{} wins", p),
            GameResult::Draw => f.write_str("Draw"),
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply`: `None` is a pass and always succeeds while the match is live
/// - `step`: Must be deterministic for replays
/// - `terminal_value`: Return `None` while the match continues
pub trait RulesEngine {
    /// Get the match configuration.
    fn config(&self) -> &EngineConfig;

    /// Apply one player's action for the current frame.
    ///
    /// A rejected action leaves the match untouched.
    fn apply(&mut self, player: PlayerId, action: Option<Placement>) -> Result<()>;

    /// Advance the simulation by `frames` frames.
    fn step(&mut self, frames: u64);

    /// Legal placements for a player, as a `width x height x hand` mask.
    fn legal_actions(&self, player: PlayerId) -> ActionMask;

    /// Check if the match is over.
    ///
    /// Returns `Some(result)` if the match has ended, `None` if it continues.
    fn terminal_value(&self) -> Option<GameResult>;

    // === Convenience Methods ===

    fn is_terminal(&self) -> bool {
        self.terminal_value().is_some()
    }

    /// Enumerate every legal placement for a player.
    fn legal_placements(&self, player: PlayerId) -> Vec<Placement> {
        self.legal_actions(player).iter_legal().collect()
    }
}
