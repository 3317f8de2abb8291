//! Rules engine trait for match drivers.
//!
//! A match implements `RulesEngine` to define:
//! - Legal placements for each side (`ActionMask`)
//! - How actions and time modify state
//! - Win/loss conditions (`GameResult`)
//!
//! Drivers call into `RulesEngine` and never touch the arena directly.

pub mod engine;
pub mod mask;

pub use engine::{GameResult, RulesEngine};
pub use mask::ActionMask;
