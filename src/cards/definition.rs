//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: its cost,
//! what kind of entity it materializes, the shared `Stats` and which behavior
//! components the spawned entities use.
//!
//! `Card` is a cheap, value-identity handle to a definition. Two handles to
//! the same card compare equal, so a deck of eight knights is eight
//! interchangeable `Card`s.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::stats::Stats;
use crate::logic::Behavior;

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Which tower a tower entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    King,
    Princess,
}

/// What a card materializes as on the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Troop,
    Building,
    Tower(TowerKind),
}

impl EntityKind {
    /// Buildings and towers: valid targets for building-only attackers.
    #[must_use]
    pub fn is_structure(self) -> bool {
        !matches!(self, EntityKind::Troop)
    }

    #[must_use]
    pub fn is_tower(self) -> bool {
        matches!(self, EntityKind::Tower(_))
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use arena_sim::cards::{CardDefinition, CardId, EntityKind, Stats};
///
/// let golem = CardDefinition::new(CardId::new(100), "golem", EntityKind::Troop)
///     .with_cost(8)
///     .with_stats(Stats { max_health: 8000, ..Stats::default() });
///
/// assert_eq!(golem.cost, 8);
/// assert!(golem.is_playable());
/// ```
#[derive(Clone, Debug)]
pub struct CardDefinition {
    pub id: CardId,

    /// Catalogue name, used to resolve decks.
    pub name: String,

    /// Elixir cost.
    pub cost: u32,

    pub kind: EntityKind,

    /// Shared by every entity spawned from this card.
    pub stats: Arc<Stats>,

    /// Behavior components selected at spawn time.
    pub behavior: Behavior,

    /// Units spawned per play.
    pub count: u32,
}

impl CardDefinition {
    /// Create a new card definition with default stats.
    ///
    /// Troops get moving behavior, structures stay put.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, kind: EntityKind) -> Self {
        let behavior = match kind {
            EntityKind::Troop => Behavior::troop(),
            EntityKind::Building | EntityKind::Tower(_) => Behavior::structure(),
        };
        Self {
            id,
            name: name.into(),
            cost: 0,
            kind,
            stats: Arc::new(Stats::default()),
            behavior,
            count: 1,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Arc::new(stats);
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Towers are arena fixtures and never go into a deck.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.kind.is_tower() && self.count > 0
    }

    /// Wrap into a shareable handle.
    #[must_use]
    pub fn into_card(self) -> Card {
        Card(Arc::new(self))
    }
}

/// Shareable handle to a card definition, compared by id.
#[derive(Clone, Debug)]
pub struct Card(Arc<CardDefinition>);

impl Card {
    #[must_use]
    pub fn id(&self) -> CardId {
        self.0.id
    }

    #[must_use]
    pub fn definition(&self) -> &CardDefinition {
        &self.0
    }
}

impl std::ops::Deref for Card {
    type Target = CardDefinition;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::MovementLogic;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(!EntityKind::Troop.is_structure());
        assert!(EntityKind::Building.is_structure());
        assert!(EntityKind::Tower(TowerKind::King).is_structure());
        assert!(EntityKind::Tower(TowerKind::Princess).is_tower());
        assert!(!EntityKind::Building.is_tower());
    }

    #[test]
    fn test_default_behavior_by_kind() {
        let troop = CardDefinition::new(CardId::new(1), "t", EntityKind::Troop);
        let building = CardDefinition::new(CardId::new(2), "b", EntityKind::Building);

        assert!(matches!(troop.behavior.movement, MovementLogic::Simple(_)));
        assert!(matches!(building.behavior.movement, MovementLogic::Stationary));
    }

    #[test]
    fn test_towers_not_playable() {
        let tower = CardDefinition::new(CardId::new(3), "king", EntityKind::Tower(TowerKind::King));
        assert!(!tower.is_playable());
    }

    #[test]
    fn test_card_value_identity() {
        let a = CardDefinition::new(CardId::new(1), "knight", EntityKind::Troop)
            .with_cost(3)
            .into_card();
        let b = a.clone();
        let c = CardDefinition::new(CardId::new(2), "archer", EntityKind::Troop).into_card();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.cost, 3);
        assert_eq!(format!("{}", a), "knight");
    }
}
