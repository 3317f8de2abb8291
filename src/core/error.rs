//! Error types for the simulation engine.
//!
//! Three families:
//! - Invalid actions (`OutOfBounds`, `InvalidHandIndex`, `InsufficientElixir`,
//!   `IllegalPlacement`, `MatchOver`): a rejected `apply()`, state unchanged.
//! - Lifecycle failures (`LifecycleFailure`, `InvalidTransition`,
//!   `EntityNotFound`): the entity is discarded, the match goes on.
//! - Construction errors (`UnknownCard`, `NotPlayable`, `InvalidDeck`,
//!   `InvalidConfig`).
//!
//! Broken invariants are not errors; they panic.

use thiserror::Error;

use crate::entities::{EntityId, LifecycleStage};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Placement ({x}, {y}) is outside the {width}x{height} arena")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("Hand index {0} is out of range")]
    InvalidHandIndex(usize),

    #[error("Card costs {cost} elixir but only {available:.2} is available")]
    InsufficientElixir { cost: u32, available: f64 },

    #[error("Cell ({x}, {y}) is not a legal placement")]
    IllegalPlacement { x: i32, y: i32 },

    #[error("The match is already over")]
    MatchOver,

    #[error("Entity {entity} failed to {stage}: {reason}")]
    LifecycleFailure {
        entity: EntityId,
        stage: LifecycleStage,
        reason: String,
    },

    #[error("Entity {entity} cannot {stage} from the {from} state")]
    InvalidTransition {
        entity: EntityId,
        stage: LifecycleStage,
        from: &'static str,
    },

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Card {0} cannot be placed in a deck")]
    NotPlayable(String),

    #[error("Deck must contain {expected} cards, found {found}")]
    InvalidDeck { expected: usize, found: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Whether this error is a rejected player action.
    #[must_use]
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            EngineError::OutOfBounds { .. }
                | EngineError::InvalidHandIndex(_)
                | EngineError::InsufficientElixir { .. }
                | EngineError::IllegalPlacement { .. }
                | EngineError::MatchOver
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
