//! # arena-sim
//!
//! A deterministic, frame-stepped arena battle simulation kernel built for
//! RL training.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed, same decks, same actions, same frames.
//!    Every match owns its RNG; there is no global state.
//!
//! 2. **Frame-Stepped**: Time only advances through `GameEngine::step`.
//!    Entities are simulated in load order, one frame at a time.
//!
//! 3. **Composition Over Inheritance**: An entity is a card's `Stats`
//!    plus a `Behavior` (target, attack and movement components) chosen at
//!    spawn time.
//!
//! ## Architecture
//!
//! - **Generational Handles**: Targets are `EntityId`s that resolve to
//!   `None` once the entity is gone, never dangling references.
//!
//! - **Atomic Actions**: A rejected `apply` leaves the match untouched.
//!
//! - **Persistent History**: Accepted actions are kept in an `im::Vector`
//!   so engine clones stay cheap.
//!
//! ## Modules
//!
//! - `core`: Sides, RNG, configuration, scheduling, actions, errors
//! - `cards`: Card definitions, stats and the catalogue
//! - `entities`: Entity lifecycle and the entity collection
//! - `logic`: Target, attack and movement components
//! - `arena`: Towers, placement rules and per-frame simulation
//! - `economy`: Elixir and hand rotation
//! - `rules`: RulesEngine trait, match results and action masks
//! - `engine`: GameEngine orchestration and renderer views

pub mod arena;
pub mod cards;
pub mod core;
pub mod economy;
pub mod engine;
pub mod entities;
pub mod logic;
pub mod rules;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, EngineConfig, EngineError, GameRng, MatchPhase, MatchTiming, Placement,
    PlayerId, PlayerMap, Position,
};

pub use crate::cards::{Card, CardDefinition, CardId, CardRegistry, EntityKind, Stats, TargetFilter};

pub use crate::entities::{Entity, EntityCollection, EntityHooks, EntityId, EntityState};

pub use crate::logic::{Behavior, FrameContext};

pub use crate::arena::{Arena, ArenaEvent};

pub use crate::economy::{Hand, Player};

pub use crate::rules::{ActionMask, GameResult, RulesEngine};

pub use crate::engine::{EntityView, FrameView, GameEngine, GameEngineBuilder, Renderer};
