//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card a match can reference, including the
//! tower fixtures. Decks are resolved by name against it.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardDefinition, CardId, EntityKind, TowerKind};
use super::stats::{Stats, TargetFilter};
use crate::core::{EngineError, Result};
use crate::logic::Behavior;

/// Cards per deck.
pub const DECK_SIZE: usize = 8;

/// Catalogue name of the king tower fixture.
pub const KING_TOWER: &str = "king_tower";

/// Catalogue name of the princess tower fixture.
pub const PRINCESS_TOWER: &str = "princess_tower";

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use arena_sim::cards::{CardDefinition, CardId, CardRegistry, EntityKind};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new(CardId::new(1), "knight", EntityKind::Troop));
///
/// let found = registry.get("knight").unwrap();
/// assert_eq!(found.id(), CardId::new(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: Vec<Card>,
    by_name: FxHashMap<String, Card>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition and return its handle.
    ///
    /// Panics if a card with the same ID or name already exists.
    pub fn register(&mut self, definition: CardDefinition) -> Card {
        if self.cards.iter().any(|c| c.id() == definition.id) {
            panic!("Card with ID {:?} already registered", definition.id);
        }
        if self.by_name.contains_key(&definition.name) {
            panic!("Card named {:?} already registered", definition.name);
        }
        let card = definition.into_card();
        self.by_name.insert(card.name.clone(), card.clone());
        self.cards.push(card.clone());
        card
    }

    /// Look a card up by catalogue name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.by_name.get(name)
    }

    /// Look a card up by ID.
    #[must_use]
    pub fn get_by_id(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    /// Look a card up by name, failing with `UnknownCard`.
    pub fn require(&self, name: &str) -> Result<Card> {
        self.get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownCard(name.to_string()))
    }

    /// Resolve a deck of exactly `DECK_SIZE` playable card names.
    pub fn resolve_deck<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Card>> {
        if names.len() != DECK_SIZE {
            return Err(EngineError::InvalidDeck {
                expected: DECK_SIZE,
                found: names.len(),
            });
        }
        names
            .iter()
            .map(|name| {
                let card = self.require(name.as_ref())?;
                if !card.is_playable() {
                    return Err(EngineError::NotPlayable(card.name.clone()));
                }
                Ok(card)
            })
            .collect()
    }

    /// Number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate cards in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// The built-in catalogue, with attack delays converted for `fps`.
    #[must_use]
    pub fn standard(fps: u32) -> Self {
        let delay = |secs: f64| Stats::delay_frames(secs, fps);
        let mut registry = Self::new();

        registry.register(
            CardDefinition::new(CardId::new(1), "knight", EntityKind::Troop)
                .with_cost(3)
                .with_stats(Stats {
                    max_health: 1766,
                    damage: 202,
                    attack_range: 1.2,
                    sight_range: 5.5,
                    speed: 1.0,
                    attack_delay: delay(1.2),
                    troop_size: 0.5,
                    is_air: false,
                    targets: TargetFilter::GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(2), "barbarian", EntityKind::Troop)
                .with_cost(5)
                .with_count(5)
                .with_stats(Stats {
                    max_health: 670,
                    damage: 192,
                    attack_range: 0.7,
                    sight_range: 5.5,
                    speed: 1.0,
                    attack_delay: delay(1.3),
                    troop_size: 0.5,
                    is_air: false,
                    targets: TargetFilter::GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(3), "archer", EntityKind::Troop)
                .with_cost(3)
                .with_count(2)
                .with_stats(Stats {
                    max_health: 304,
                    damage: 107,
                    attack_range: 5.0,
                    sight_range: 5.5,
                    speed: 1.0,
                    attack_delay: delay(0.9),
                    troop_size: 0.5,
                    is_air: false,
                    targets: TargetFilter::AIR_AND_GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(4), "musketeer", EntityKind::Troop)
                .with_cost(4)
                .with_stats(Stats {
                    max_health: 720,
                    damage: 218,
                    attack_range: 6.0,
                    sight_range: 6.0,
                    speed: 1.0,
                    attack_delay: delay(1.0),
                    troop_size: 0.5,
                    is_air: false,
                    targets: TargetFilter::AIR_AND_GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(5), "giant", EntityKind::Troop)
                .with_cost(5)
                .with_stats(Stats {
                    max_health: 4091,
                    damage: 254,
                    attack_range: 1.2,
                    sight_range: 7.5,
                    speed: 0.75,
                    attack_delay: delay(1.5),
                    troop_size: 0.75,
                    is_air: false,
                    targets: TargetFilter::BUILDINGS,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(6), "minions", EntityKind::Troop)
                .with_cost(3)
                .with_count(3)
                .with_stats(Stats {
                    max_health: 230,
                    damage: 107,
                    attack_range: 1.6,
                    sight_range: 5.5,
                    speed: 1.5,
                    attack_delay: delay(1.0),
                    troop_size: 0.4,
                    is_air: true,
                    targets: TargetFilter::AIR_AND_GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(7), "valkyrie", EntityKind::Troop)
                .with_cost(4)
                .with_behavior(Behavior::splash_troop(1.0))
                .with_stats(Stats {
                    max_health: 1908,
                    damage: 266,
                    attack_range: 1.2,
                    sight_range: 5.5,
                    speed: 1.0,
                    attack_delay: delay(1.5),
                    troop_size: 0.5,
                    is_air: false,
                    targets: TargetFilter::GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(8), "cannon", EntityKind::Building)
                .with_cost(3)
                .with_stats(Stats {
                    max_health: 824,
                    damage: 212,
                    attack_range: 5.5,
                    sight_range: 5.5,
                    speed: 0.0,
                    attack_delay: delay(0.9),
                    troop_size: 0.6,
                    is_air: false,
                    targets: TargetFilter::GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(CardId::new(100), KING_TOWER, EntityKind::Tower(TowerKind::King))
                .with_stats(Stats {
                    max_health: 6408,
                    damage: 144,
                    attack_range: 7.0,
                    sight_range: 7.0,
                    speed: 0.0,
                    attack_delay: delay(1.0),
                    troop_size: 2.0,
                    is_air: false,
                    targets: TargetFilter::AIR_AND_GROUND,
                }),
        );
        registry.register(
            CardDefinition::new(
                CardId::new(101),
                PRINCESS_TOWER,
                EntityKind::Tower(TowerKind::Princess),
            )
            .with_stats(Stats {
                max_health: 3052,
                damage: 109,
                attack_range: 7.5,
                sight_range: 7.5,
                speed: 0.0,
                attack_delay: delay(0.8),
                troop_size: 1.5,
                is_air: false,
                targets: TargetFilter::AIR_AND_GROUND,
            }),
        );

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Vec<&'static str> {
        vec![
            "knight", "barbarian", "archer", "musketeer", "giant", "minions", "valkyrie", "cannon",
        ]
    }

    #[test]
    fn test_standard_catalogue() {
        let registry = CardRegistry::standard(30);

        assert_eq!(registry.len(), 10);
        let knight = registry.get("knight").unwrap();
        assert_eq!(knight.cost, 3);
        assert_eq!(knight.stats.attack_delay, 36);
        assert!(registry.get(KING_TOWER).is_some());
        assert!(registry.get(PRINCESS_TOWER).is_some());
        for card in registry.iter() {
            assert!(card.stats.validate().is_ok(), "{} has invalid stats", card.name);
        }
    }

    #[test]
    fn test_attack_delay_tracks_fps() {
        let registry = CardRegistry::standard(10);
        assert_eq!(registry.get("knight").unwrap().stats.attack_delay, 12);
    }

    #[test]
    fn test_resolve_deck() {
        let registry = CardRegistry::standard(30);
        let cards = registry.resolve_deck(&deck()).unwrap();

        assert_eq!(cards.len(), DECK_SIZE);
        assert_eq!(cards[0].name, "knight");
    }

    #[test]
    fn test_resolve_deck_unknown() {
        let registry = CardRegistry::standard(30);
        let mut names = deck();
        names[3] = "dragon";

        let err = registry.resolve_deck(&names).unwrap_err();
        assert_eq!(err, EngineError::UnknownCard("dragon".into()));
    }

    #[test]
    fn test_resolve_deck_rejects_towers() {
        let registry = CardRegistry::standard(30);
        let mut names = deck();
        names[0] = KING_TOWER;

        let err = registry.resolve_deck(&names).unwrap_err();
        assert!(matches!(err, EngineError::NotPlayable(_)));
    }

    #[test]
    fn test_resolve_deck_wrong_size() {
        let registry = CardRegistry::standard(30);
        let err = registry.resolve_deck(&["knight"; 7]).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidDeck {
                expected: 8,
                found: 7
            }
        );
    }

    #[test]
    fn test_duplicate_cards_allowed_in_deck() {
        let registry = CardRegistry::standard(30);
        let cards = registry.resolve_deck(&["knight"; 8]).unwrap();
        assert!(cards.iter().all(|c| c.name == "knight"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "a", EntityKind::Troop));
        registry.register(CardDefinition::new(CardId::new(1), "b", EntityKind::Troop));
    }
}
