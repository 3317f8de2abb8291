//! Arena entities and the collection that owns them.
//!
//! ## Key Types
//!
//! - `Entity`: A troop, building or tower with a lifecycle state
//! - `EntityId`: Generational handle, safe to hold after removal
//! - `EntityHooks`: Optional fallible lifecycle side effects
//! - `EntityCollection`: Slot table iterated in load order

pub mod collection;
pub mod entity;

pub use collection::EntityCollection;
pub use entity::{
    Entity, EntityHooks, EntityId, EntityState, HookError, HookResult, LifecycleStage,
};
