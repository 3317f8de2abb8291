//! Four visible cards, one preview card and a rotation queue.
//!
//! A hand always holds exactly `DECK_SIZE` cards. Playing slot `i` sends the
//! played card to the back of the queue, moves the preview card into slot
//! `i` and draws the new preview from the front of the queue.

use std::collections::VecDeque;

use crate::cards::{Card, DECK_SIZE};
use crate::core::{EngineError, Result};

/// Visible hand slots.
pub const HAND_SIZE: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    slots: [Card; HAND_SIZE],
    next: Card,
    queue: VecDeque<Card>,
}

impl Hand {
    /// Deal a hand from a deck already in draw order.
    pub fn new(deck: Vec<Card>) -> Result<Self> {
        if deck.len() != DECK_SIZE {
            return Err(EngineError::InvalidDeck {
                expected: DECK_SIZE,
                found: deck.len(),
            });
        }
        let mut queue: VecDeque<Card> = deck.into();
        let mut draw = || {
            queue
                .pop_front()
                .ok_or(EngineError::InvalidDeck {
                    expected: DECK_SIZE,
                    found: 0,
                })
        };
        let slots = [draw()?, draw()?, draw()?, draw()?];
        let next = draw()?;
        Ok(Self { slots, next, queue })
    }

    /// Card in slot `index`.
    pub fn get(&self, index: usize) -> Result<&Card> {
        self.slots
            .get(index)
            .ok_or(EngineError::InvalidHandIndex(index))
    }

    #[must_use]
    pub fn slots(&self) -> &[Card; HAND_SIZE] {
        &self.slots
    }

    /// The card that replaces the next one played.
    #[must_use]
    pub fn next(&self) -> &Card {
        &self.next
    }

    /// Cards waiting behind the preview, front first.
    pub fn queue(&self) -> impl Iterator<Item = &Card> {
        self.queue.iter()
    }

    /// Every card held: slots, preview, then queue.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.slots
            .iter()
            .chain(std::iter::once(&self.next))
            .chain(self.queue.iter())
    }

    /// Play slot `index` and rotate. Returns the played card.
    pub fn play(&mut self, index: usize) -> Result<Card> {
        if index >= HAND_SIZE {
            return Err(EngineError::InvalidHandIndex(index));
        }
        let Some(drawn) = self.queue.pop_front() else {
            panic!("hand queue is empty; a hand must always hold {} cards", DECK_SIZE);
        };
        let preview = std::mem::replace(&mut self.next, drawn);
        let played = std::mem::replace(&mut self.slots[index], preview);
        self.queue.push_back(played.clone());
        debug_assert_eq!(self.cards().count(), DECK_SIZE);
        Ok(played)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, EntityKind};

    fn deck() -> Vec<Card> {
        (0..8)
            .map(|i| {
                CardDefinition::new(CardId::new(i), format!("c{}", i), EntityKind::Troop)
                    .with_cost(i + 1)
                    .into_card()
            })
            .collect()
    }

    fn names<'a>(cards: impl Iterator<Item = &'a Card>) -> Vec<String> {
        cards.map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_deal() {
        let hand = Hand::new(deck()).unwrap();

        assert_eq!(names(hand.slots().iter()), vec!["c0", "c1", "c2", "c3"]);
        assert_eq!(hand.next().name, "c4");
        assert_eq!(names(hand.queue()), vec!["c5", "c6", "c7"]);
    }

    #[test]
    fn test_play_rotates() {
        let mut hand = Hand::new(deck()).unwrap();
        let played = hand.play(1).unwrap();

        assert_eq!(played.name, "c1");
        assert_eq!(names(hand.slots().iter()), vec!["c0", "c4", "c2", "c3"]);
        assert_eq!(hand.next().name, "c5");
        assert_eq!(names(hand.queue()), vec!["c6", "c7", "c1"]);
    }

    #[test]
    fn test_played_card_returns_after_cycle() {
        let mut hand = Hand::new(deck()).unwrap();
        hand.play(0).unwrap();
        for _ in 0..3 {
            hand.play(3).unwrap();
        }
        // c0 went to the back of a 3-card queue; three more plays surface it.
        assert_eq!(hand.next().name, "c0");
    }

    #[test]
    fn test_invalid_index() {
        let mut hand = Hand::new(deck()).unwrap();
        let before = hand.clone();

        assert_eq!(hand.play(4), Err(EngineError::InvalidHandIndex(4)));
        assert_eq!(hand, before);
        assert!(hand.get(7).is_err());
    }

    #[test]
    fn test_wrong_deck_size() {
        let mut short = deck();
        short.pop();
        assert_eq!(
            Hand::new(short),
            Err(EngineError::InvalidDeck {
                expected: 8,
                found: 7
            })
        );
    }
}
