//! Side identification and per-side data storage.
//!
//! ## PlayerId
//!
//! Type-safe identifier for one of the two sides of a match. Side 0 deploys
//! on the bottom half of the arena, side 1 on the top half.
//!
//! ## PlayerMap
//!
//! Per-side storage backed by a fixed array for O(1) access.
//! Supports iteration and indexing by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of sides in a match.
pub const SIDE_COUNT: usize = 2;

/// Identifier for one side of a match (0 or 1).
///
/// The index is private so every `PlayerId` in circulation is a valid
/// `PlayerMap` key. Deserializing an out-of-range side fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// The side deploying on the bottom half (blue).
    pub const BLUE: PlayerId = PlayerId(0);

    /// The side deploying on the top half (red).
    pub const RED: PlayerId = PlayerId(1);

    /// Create a new player ID.
    ///
    /// Panics if `id` is not a valid side.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < SIDE_COUNT, "Side must be 0 or 1");
        Self(id)
    }

    /// Convert a raw index into a side, if valid.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SIDE_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Get the raw side index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Iterate over both sides in index order.
    ///
    /// ```
    /// use arena_sim::core::PlayerId;
    ///
    /// let sides: Vec<_> = PlayerId::both().collect();
    /// assert_eq!(sides, vec![PlayerId::BLUE, PlayerId::RED]);
    /// ```
    pub fn both() -> impl Iterator<Item = PlayerId> {
        (0..SIDE_COUNT as u8).map(PlayerId)
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_index(usize::from(id)).ok_or_else(|| format!("side must be 0 or 1, got {}", id))
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> u8 {
        player.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use arena_sim::core::{PlayerId, PlayerMap};
///
/// let mut towers: PlayerMap<u8> = PlayerMap::with_value(3);
/// towers[PlayerId::RED] -= 1;
///
/// assert_eq!(towers[PlayerId::BLUE], 3);
/// assert_eq!(towers[PlayerId::RED], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; SIDE_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    /// Create a PlayerMap from one value per side.
    pub fn from_pair(blue: T, red: T) -> Self {
        Self { data: [blue, red] }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
