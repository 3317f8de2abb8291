//! Core engine types: sides, RNG, configuration, scheduling, actions, errors.
//!
//! Nothing here depends on cards, the arena or the engine. `error` names
//! entity ids and lifecycle stages and is the only outward reference.

pub mod action;
pub mod config;
pub mod error;
pub mod geometry;
pub mod player;
pub mod rng;
pub mod scheduler;

pub use action::{ActionRecord, Placement};
pub use config::{ElixirRates, EngineConfig, MatchTiming};
pub use error::{EngineError, Result};
pub use geometry::Position;
pub use player::{PlayerId, PlayerMap, SIDE_COUNT};
pub use rng::GameRng;
pub use scheduler::{DefaultScheduler, GameScheduler, MatchPhase, Scheduler};
