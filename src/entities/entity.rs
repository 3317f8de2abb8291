//! A single arena entity and its lifecycle.
//!
//! ```text
//!                   +<---------------------+
//! Created -> Loaded -> Started -> Stopped -+-> Unloaded
//! ```
//!
//! Re-requesting the current state is a no-op. Every other transition not
//! drawn above is rejected with `InvalidTransition`. Only `Started` entities
//! take part in targeting, combat and movement.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::cards::{Card, EntityKind, Stats};
use crate::core::{EngineError, PlayerId, Position, Result};
use crate::logic::Behavior;

/// Generational handle to an entity in an `EntityCollection`.
///
/// A handle outlives the entity it names; once the slot is reused the
/// generation no longer matches and lookups return `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl EntityId {
    /// Id carried by an entity that is not in any collection.
    pub const DETACHED: EntityId = EntityId {
        index: u32::MAX,
        generation: 0,
    };

    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[must_use]
    pub fn is_detached(self) -> bool {
        self == Self::DETACHED
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_detached() {
            f.write_str("Entity(detached)")
        } else {
            write!(f, "Entity({}v{})", self.index, self.generation)
        }
    }
}

/// Lifecycle state. Unrelated to gameplay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    Created,
    Loaded,
    Started,
    Stopped,
    Unloaded,
}

impl EntityState {
    #[must_use]
    pub fn is_running(self) -> bool {
        self == EntityState::Started
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EntityState::Created => "created",
            EntityState::Loaded => "loaded",
            EntityState::Started => "started",
            EntityState::Stopped => "stopped",
            EntityState::Unloaded => "unloaded",
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested lifecycle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStage {
    Load,
    Start,
    Stop,
    Unload,
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleStage::Load => "load",
            LifecycleStage::Start => "start",
            LifecycleStage::Stop => "stop",
            LifecycleStage::Unload => "unload",
        };
        f.write_str(name)
    }
}

/// Failure reported by a lifecycle hook.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct HookError(pub String);

pub type HookResult = std::result::Result<(), HookError>;

/// Optional side effects run on lifecycle transitions.
///
/// Each hook runs once per actual transition, never on a no-op request.
/// Hooks observe the entity but cannot mutate it.
pub trait EntityHooks: std::fmt::Debug + Send + Sync {
    fn on_load(&self, _entity: &Entity) -> HookResult {
        Ok(())
    }

    fn on_start(&self, _entity: &Entity) -> HookResult {
        Ok(())
    }

    fn on_stop(&self, _entity: &Entity) -> HookResult {
        Ok(())
    }

    fn on_unload(&self, _entity: &Entity) -> HookResult {
        Ok(())
    }
}

/// Something present on the arena: a troop, building or tower.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Assigned by the collection on load.
    pub id: EntityId,

    pub card: Card,

    pub kind: EntityKind,

    /// Owning side.
    pub side: PlayerId,

    pub position: Position,

    /// Current health, in `[0, max_health]`.
    pub health: i32,

    state: EntityState,

    /// Non-owning reference, re-selected every frame.
    pub target: Option<EntityId>,

    /// Frame of the most recent attack.
    pub last_attack_frame: Option<u64>,

    pub behavior: Behavior,

    /// Dormant entities neither target nor attack (an inactive king tower).
    pub dormant: bool,

    hooks: Option<Arc<dyn EntityHooks>>,
}

impl Entity {
    /// Create a detached entity from a card at full health.
    #[must_use]
    pub fn new(card: Card, side: PlayerId, position: Position) -> Self {
        Self {
            id: EntityId::DETACHED,
            kind: card.kind,
            health: card.stats.max_health,
            behavior: card.behavior,
            card,
            side,
            position,
            state: EntityState::Created,
            target: None,
            last_attack_frame: None,
            dormant: false,
            hooks: None,
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn EntityHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    #[must_use]
    pub fn with_dormant(mut self, dormant: bool) -> Self {
        self.dormant = dormant;
        self
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.card.stats
    }

    #[must_use]
    pub fn state(&self) -> EntityState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[must_use]
    pub fn is_air(&self) -> bool {
        self.card.stats.is_air
    }

    /// Subtract `amount`, clamping at zero. Returns `true` if this killed it.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount.max(0)).max(0);
        was_alive && !self.is_alive()
    }

    /// `Created -> Loaded`. Validates stats, then runs `on_load`.
    ///
    /// On failure the entity stays `Created`.
    pub fn load(&mut self) -> Result<()> {
        match self.state {
            EntityState::Loaded => return Ok(()),
            EntityState::Created => {}
            other => return Err(self.invalid(LifecycleStage::Load, other)),
        }
        self.card
            .stats
            .validate()
            .map_err(|reason| self.failure(LifecycleStage::Load, reason))?;
        self.run_hook(LifecycleStage::Load)?;
        self.state = EntityState::Loaded;
        Ok(())
    }

    /// `Loaded | Stopped -> Started`. Requires a finite position.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            EntityState::Started => return Ok(()),
            EntityState::Loaded | EntityState::Stopped => {}
            other => return Err(self.invalid(LifecycleStage::Start, other)),
        }
        if !self.position.is_finite() {
            return Err(self.failure(
                LifecycleStage::Start,
                format!("position ({}, {}) is not finite", self.position.x, self.position.y),
            ));
        }
        self.run_hook(LifecycleStage::Start)?;
        self.state = EntityState::Started;
        Ok(())
    }

    /// `Started -> Stopped`.
    ///
    /// The entity is stopped even when `on_stop` fails.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            EntityState::Stopped => return Ok(()),
            EntityState::Started => {}
            other => return Err(self.invalid(LifecycleStage::Stop, other)),
        }
        let hook = self.run_hook(LifecycleStage::Stop);
        self.state = EntityState::Stopped;
        self.target = None;
        hook
    }

    /// Any live state `-> Unloaded`. Terminal.
    ///
    /// A running entity must be stopped first. The entity ends up unloaded
    /// even when `on_unload` fails; the error is still returned.
    pub fn unload(&mut self) -> Result<()> {
        match self.state {
            EntityState::Unloaded => return Ok(()),
            EntityState::Started => {
                return Err(self.invalid(LifecycleStage::Unload, EntityState::Started))
            }
            EntityState::Created | EntityState::Loaded | EntityState::Stopped => {}
        }
        let hook = self.run_hook(LifecycleStage::Unload);
        self.state = EntityState::Unloaded;
        self.target = None;
        hook
    }

    /// Mark as unloaded without running hooks.
    pub(crate) fn force_unload(&mut self) {
        self.state = EntityState::Unloaded;
        self.target = None;
    }

    fn run_hook(&self, stage: LifecycleStage) -> Result<()> {
        let Some(hooks) = &self.hooks else {
            return Ok(());
        };
        let result = match stage {
            LifecycleStage::Load => hooks.on_load(self),
            LifecycleStage::Start => hooks.on_start(self),
            LifecycleStage::Stop => hooks.on_stop(self),
            LifecycleStage::Unload => hooks.on_unload(self),
        };
        result.map_err(|e| self.failure(stage, e.0))
    }

    fn failure(&self, stage: LifecycleStage, reason: String) -> EngineError {
        EngineError::LifecycleFailure {
            entity: self.id,
            stage,
            reason,
        }
    }

    fn invalid(&self, stage: LifecycleStage, from: EntityState) -> EngineError {
        EngineError::InvalidTransition {
            entity: self.id,
            stage,
            from: from.name(),
        }
    }
}
