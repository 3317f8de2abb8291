//! Storage and lifecycle management for many entities.
//!
//! Entities live in a generational slot table. Iteration follows load order,
//! which is also the order entities are simulated in.

use tracing::warn;

use super::entity::{Entity, EntityId, EntityState, LifecycleStage};
use crate::core::{EngineError, Result};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Owns entities and drives their lifecycle.
///
/// ## Example
///
/// ```
/// use arena_sim::cards::CardRegistry;
/// use arena_sim::core::{PlayerId, Position};
/// use arena_sim::entities::{Entity, EntityCollection};
///
/// let registry = CardRegistry::standard(30);
/// let knight = registry.get("knight").unwrap().clone();
///
/// let mut entities = EntityCollection::new();
/// let id = entities.load(Entity::new(knight, PlayerId::BLUE, Position::new(3.5, 20.5))).unwrap();
/// entities.start(id).unwrap();
///
/// assert!(entities.get_running(id).is_some());
/// assert_eq!(entities.num_loaded(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EntityCollection {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<EntityId>,
    running: bool,
    num_loaded: usize,
    max_loaded: usize,
}

impl EntityCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an entity and take ownership of it.
    ///
    /// Nothing is inserted when loading fails.
    pub fn load(&mut self, mut entity: Entity) -> Result<EntityId> {
        if entity.state() != EntityState::Created {
            return Err(EngineError::InvalidTransition {
                entity: entity.id,
                stage: LifecycleStage::Load,
                from: entity.state().name(),
            });
        }
        let id = self.reserve();
        entity.id = id;
        if let Err(e) = entity.load() {
            self.free.push(id.index);
            return Err(e);
        }
        self.slots[id.index as usize].entity = Some(entity);
        self.order.push(id);
        self.num_loaded += 1;
        self.max_loaded += 1;
        Ok(id)
    }

    /// Stop (if running) and unload an entity, then remove it.
    ///
    /// Removal happens even if a hook fails, in which case the hook error is
    /// returned. Targets pointing at the entity are cleared.
    pub fn unload(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self.get_mut(id).ok_or(EngineError::EntityNotFound(id))?;
        let stopped = if entity.is_running() {
            entity.stop()
        } else {
            Ok(())
        };
        let unloaded = entity.unload();
        let removed = self.remove(id);
        match (stopped, unloaded) {
            (Err(e), _) | (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(())) => removed.ok_or(EngineError::EntityNotFound(id)),
        }
    }

    /// Start an entity.
    ///
    /// A failed start unloads it. A start requested from the wrong state is
    /// refused and the entity is left as it was.
    pub fn start(&mut self, id: EntityId) -> Result<()> {
        let entity = self.get_mut(id).ok_or(EngineError::EntityNotFound(id))?;
        let result = entity.start();
        self.settle(id, result, "start")
    }

    /// Stop an entity. Failure handling matches `start`.
    pub fn stop(&mut self, id: EntityId) -> Result<()> {
        let entity = self.get_mut(id).ok_or(EngineError::EntityNotFound(id))?;
        let result = entity.stop();
        self.settle(id, result, "stop")
    }

    /// Discard the entity if `result` is a failed side effect.
    fn settle(&mut self, id: EntityId, result: Result<()>, stage: &str) -> Result<()> {
        if let Err(e @ EngineError::LifecycleFailure { .. }) = &result {
            warn!(entity = %id, error = %e, "{} failed, unloading", stage);
            self.discard(id);
        }
        result
    }

    /// Stop then start an entity that is currently running.
    pub fn restart(&mut self, id: EntityId) -> Result<()> {
        self.stop(id)?;
        self.start(id)
    }

    /// Mark the collection running and start every entity that is not.
    ///
    /// Returns the failures; failed entities are unloaded.
    pub fn start_all(&mut self) -> Vec<EngineError> {
        self.running = true;
        let pending: Vec<EntityId> = self
            .iter()
            .filter(|e| !e.is_running())
            .map(|e| e.id)
            .collect();
        pending
            .into_iter()
            .filter_map(|id| self.start(id).err())
            .collect()
    }

    /// Mark the collection stopped and stop every running entity.
    pub fn stop_all(&mut self) -> Vec<EngineError> {
        self.running = false;
        let ids = self.running_ids();
        ids.into_iter().filter_map(|id| self.stop(id).err()).collect()
    }

    /// Unload everything, in load order.
    pub fn clear(&mut self) -> Vec<EngineError> {
        let ids = self.order.clone();
        ids.into_iter().filter_map(|id| self.unload(id).err()).collect()
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Get an entity only if it is running.
    #[must_use]
    pub fn get_running(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).filter(|e| e.is_running())
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// All entities in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(move |id| self.get(*id))
    }

    /// Running entities in load order.
    pub fn running(&self) -> impl Iterator<Item = &Entity> {
        self.iter().filter(|e| e.is_running())
    }

    /// Snapshot of running ids in load order.
    #[must_use]
    pub fn running_ids(&self) -> Vec<EntityId> {
        self.running().map(|e| e.id).collect()
    }

    /// Whether `start_all` was called more recently than `stop_all`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entities currently loaded.
    #[must_use]
    pub fn num_loaded(&self) -> usize {
        self.num_loaded
    }

    /// Entities ever loaded into this collection.
    #[must_use]
    pub fn max_loaded(&self) -> usize {
        self.max_loaded
    }

    fn reserve(&mut self) -> EntityId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                EntityId::new(index, slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len()).expect("entity slot table overflow");
                self.slots.push(Slot {
                    generation: 0,
                    entity: None,
                });
                EntityId::new(index, 0)
            }
        }
    }

    /// Unload without hooks and remove.
    fn discard(&mut self, id: EntityId) {
        if let Some(entity) = self.get_mut(id) {
            entity.force_unload();
        }
        self.remove(id);
    }

    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        self.free.push(id.index);
        self.order.retain(|other| *other != id);
        self.num_loaded -= 1;
        for slot in &mut self.slots {
            if let Some(other) = slot.entity.as_mut() {
                if other.target == Some(id) {
                    other.target = None;
                }
            }
        }
        Some(entity)
    }
}
