//! Per-side match state: elixir, hand and tower bookkeeping.

use smallvec::SmallVec;

use super::hand::{Hand, HAND_SIZE};
use crate::cards::Card;
use crate::core::{EngineConfig, EngineError, PlayerId, Result};

/// Tower count at the start of a match.
pub const STARTING_TOWERS: u8 = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,

    /// Never negative; never above `elixir_cap` when one is set.
    elixir: f64,

    elixir_cap: Option<f64>,

    fps: u32,

    hand: Hand,

    /// Surviving towers, mirrored from the arena.
    pub towers: u8,

    pub king_activated: bool,
}

impl Player {
    /// Create a player holding `deck` in draw order.
    pub fn new(id: PlayerId, deck: Vec<Card>, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            id,
            elixir: config.starting_elixir,
            elixir_cap: config.elixir_cap,
            fps: config.fps,
            hand: Hand::new(deck)?,
            towers: STARTING_TOWERS,
            king_activated: false,
        })
    }

    /// Start a new match with a freshly ordered deck.
    pub fn reset(&mut self, deck: Vec<Card>, elixir: f64) -> Result<()> {
        self.hand = Hand::new(deck)?;
        self.elixir = elixir;
        self.towers = STARTING_TOWERS;
        self.king_activated = false;
        Ok(())
    }

    #[must_use]
    pub fn elixir(&self) -> f64 {
        self.elixir
    }

    #[must_use]
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Hand slots whose card costs no more than the current elixir.
    #[must_use]
    pub fn get_pseudo_legal_cards(&self) -> SmallVec<[usize; HAND_SIZE]> {
        self.hand
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, card)| f64::from(card.cost) <= self.elixir)
            .map(|(index, _)| index)
            .collect()
    }

    /// Check that slot `index` exists and is affordable.
    pub fn can_play(&self, index: usize) -> Result<&Card> {
        let card = self.hand.get(index)?;
        if f64::from(card.cost) > self.elixir {
            return Err(EngineError::InsufficientElixir {
                cost: card.cost,
                available: self.elixir,
            });
        }
        Ok(card)
    }

    /// Pay for slot `index` and rotate the hand. Nothing changes on error.
    pub fn play_card(&mut self, index: usize) -> Result<Card> {
        let cost = f64::from(self.can_play(index)?.cost);
        let card = self.hand.play(index)?;
        self.elixir = (self.elixir - cost).max(0.0);
        Ok(card)
    }

    /// Accrue elixir for `frames` frames at `rate` per second.
    pub fn step(&mut self, rate: f64, frames: u64) {
        let gained = rate / f64::from(self.fps) * frames as f64;
        self.elixir += gained.max(0.0);
        if let Some(cap) = self.elixir_cap {
            self.elixir = self.elixir.min(cap);
        }
    }

    pub fn lose_tower(&mut self) {
        self.towers = self
            .towers
            .checked_sub(1)
            .expect("player lost more towers than it had");
    }

    pub fn activate_king(&mut self) {
        self.king_activated = true;
    }
}
