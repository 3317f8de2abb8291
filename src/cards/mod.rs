//! Card system: definitions, stats and the registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `Stats`: Combat and movement numbers shared by spawned entities
//! - `CardDefinition`: Static card data (cost, kind, stats, behavior)
//! - `Card`: Shareable handle with value identity
//! - `CardRegistry`: Name lookup and deck resolution
//!
//! Towers are registered like any other card but are not playable.

pub mod definition;
pub mod registry;
pub mod stats;

pub use definition::{Card, CardDefinition, CardId, EntityKind, TowerKind};
pub use registry::{CardRegistry, DECK_SIZE, KING_TOWER, PRINCESS_TOWER};
pub use stats::{Stats, TargetFilter};
