//! Elixir economy and hand rotation.

pub mod hand;
pub mod player;

pub use hand::{Hand, HAND_SIZE};
pub use player::{Player, STARTING_TOWERS};
