//! Static combat stats shared by every entity spawned from one card.
//!
//! Dynamic state (current health, position, cooldowns) lives on the entity;
//! `Stats` is never mutated once a card is registered.

use serde::{Deserialize, Serialize};

/// Which kinds of entity an attacker may select as a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFilter {
    /// May target flying units.
    pub air: bool,
    /// May target ground units, buildings and towers.
    pub ground: bool,
    /// Ignores troops entirely (buildings and towers only).
    pub buildings_only: bool,
}

impl TargetFilter {
    /// Ground troops, buildings and towers.
    pub const GROUND: TargetFilter = TargetFilter {
        air: false,
        ground: true,
        buildings_only: false,
    };

    /// Everything.
    pub const AIR_AND_GROUND: TargetFilter = TargetFilter {
        air: true,
        ground: true,
        buildings_only: false,
    };

    /// Buildings and towers only.
    pub const BUILDINGS: TargetFilter = TargetFilter {
        air: false,
        ground: true,
        buildings_only: true,
    };

    /// Whether an entity with the given traits passes this filter.
    #[must_use]
    pub fn allows(&self, is_air: bool, is_structure: bool) -> bool {
        if self.buildings_only && !is_structure {
            return false;
        }
        if is_air {
            self.air
        } else {
            self.ground
        }
    }
}

/// Per-card combat and movement stats.
///
/// Distances are in tiles, `speed` in tiles per second and `attack_delay` in
/// frames at the frame rate the catalogue was built for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub max_health: i32,
    pub damage: i32,
    pub attack_range: f64,
    pub sight_range: f64,
    pub speed: f64,
    pub attack_delay: u32,
    /// Radius of the unit, used for spawn spacing, tower footprints and rendering.
    pub troop_size: f64,
    pub is_air: bool,
    pub targets: TargetFilter,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            max_health: 1,
            damage: 0,
            attack_range: 0.0,
            sight_range: 0.0,
            speed: 0.0,
            attack_delay: 0,
            troop_size: 0.5,
            is_air: false,
            targets: TargetFilter::GROUND,
        }
    }
}

impl Stats {
    /// Convert a hit speed in seconds to an attack delay in frames.
    #[must_use]
    pub fn delay_frames(hit_speed: f64, fps: u32) -> u32 {
        (hit_speed * f64::from(fps)).round().max(0.0) as u32
    }

    /// Check that the stats describe a spawnable entity.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_health <= 0 {
            return Err(format!("max health must be positive, got {}", self.max_health));
        }
        if self.damage < 0 {
            return Err(format!("damage must be non-negative, got {}", self.damage));
        }
        let distances = [
            ("attack range", self.attack_range),
            ("sight range", self.sight_range),
            ("speed", self.speed),
            ("troop size", self.troop_size),
        ];
        for (name, value) in distances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} must be finite and non-negative, got {}", name, value));
            }
        }
        Ok(())
    }
}
