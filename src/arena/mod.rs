//! The arena: both sides' entities, towers and placement rules.
//!
//! The arena owns every live entity. Each frame it walks running entities in
//! load order and, for each one, retargets, attacks if it can and otherwise
//! moves. Damage is applied as soon as an attack lands and dead entities are
//! removed on the spot, so later entities in the same frame never see them.

pub mod layout;

use tracing::{debug, warn};

use crate::cards::{Card, CardId, CardRegistry, EntityKind, TowerKind, KING_TOWER, PRINCESS_TOWER};
use crate::core::{EngineError, PlayerId, PlayerMap, Position, Result};
use crate::entities::{Entity, EntityCollection, EntityId};
use crate::logic::{Attack, FrameContext, Movement, Strike, Target};

pub use layout::{footprint_covers, Lane, Layout, POCKET_DEPTH};

/// Something that happened during `Arena::step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaEvent {
    /// An entity died and was removed.
    EntityDestroyed {
        entity: EntityId,
        side: PlayerId,
        card: CardId,
    },
    TowerDestroyed {
        side: PlayerId,
        tower: TowerKind,
    },
    /// A dormant king tower woke up.
    KingActivated { side: PlayerId },
}

/// Tower entities of one side. `None` once destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Towers {
    king: Option<EntityId>,
    princess: [Option<EntityId>; 2],
}

impl Towers {
    fn count(&self) -> u8 {
        let princesses = self.princess.iter().filter(|t| t.is_some()).count();
        (princesses + usize::from(self.king.is_some())) as u8
    }

    fn all(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.king.iter().chain(self.princess.iter().flatten()).copied()
    }
}

/// Spatial container for one match.
#[derive(Clone, Debug)]
pub struct Arena {
    layout: Layout,
    fps: u32,
    entities: EntityCollection,
    towers: PlayerMap<Towers>,
    /// Where each side's troops head with nothing to target.
    objectives: PlayerMap<Position>,
    king_card: Card,
    princess_card: Card,
}

impl Arena {
    /// Create an arena with both sides' towers in place.
    ///
    /// The registry must contain the tower fixtures.
    pub fn new(width: u32, height: u32, fps: u32, registry: &CardRegistry) -> Result<Self> {
        let layout = Layout::new(width, height);
        let objectives = PlayerMap::new(|side| layout.king_anchor(side.opponent()));
        let mut arena = Self {
            layout,
            fps,
            entities: EntityCollection::new(),
            towers: PlayerMap::with_default(),
            objectives,
            king_card: registry.require(KING_TOWER)?,
            princess_card: registry.require(PRINCESS_TOWER)?,
        };
        arena.reset()?;
        Ok(arena)
    }

    /// Remove every entity and rebuild the towers.
    pub fn reset(&mut self) -> Result<()> {
        for error in self.entities.clear() {
            warn!(%error, "entity failed to unload during reset");
        }
        self.towers = PlayerMap::with_default();

        for side in PlayerId::both() {
            let anchor = self.layout.king_anchor(side);
            let king = self.spawn_tower(self.king_card.clone(), side, anchor, true)?;
            self.towers[side].king = Some(king);
            for lane in Lane::ALL {
                let anchor = self.layout.princess_anchor(side, lane);
                let tower = self.spawn_tower(self.princess_card.clone(), side, anchor, false)?;
                self.towers[side].princess[lane.index()] = Some(tower);
            }
        }
        for error in self.entities.start_all() {
            warn!(%error, "tower failed to start");
        }
        debug!(entities = self.entities.len(), "arena reset");
        Ok(())
    }

    fn spawn_tower(
        &mut self,
        card: Card,
        side: PlayerId,
        anchor: Position,
        dormant: bool,
    ) -> Result<EntityId> {
        let entity = Entity::new(card, side, anchor).with_dormant(dormant);
        self.entities.load(entity)
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.layout.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.layout.height
    }

    #[must_use]
    pub fn entities(&self) -> &EntityCollection {
        &self.entities
    }

    /// Mutable access for callers that load their own entities.
    pub fn entities_mut(&mut self) -> &mut EntityCollection {
        &mut self.entities
    }

    /// Where `side`'s troops walk when they have no target.
    #[must_use]
    pub fn objective(&self, side: PlayerId) -> Position {
        self.objectives[side]
    }

    /// Surviving towers of `side`, king included.
    #[must_use]
    pub fn tower_count(&self, side: PlayerId) -> u8 {
        self.towers[side].count()
    }

    /// Health of `side`'s weakest surviving tower, or 0 with none left.
    #[must_use]
    pub fn lowest_tower_health(&self, side: PlayerId) -> i32 {
        self.towers[side]
            .all()
            .filter_map(|id| self.entities.get(id))
            .map(|tower| tower.health)
            .min()
            .unwrap_or(0)
    }

    /// `side`'s king tower, if it still stands.
    #[must_use]
    pub fn king(&self, side: PlayerId) -> Option<&Entity> {
        self.towers[side].king.and_then(|id| self.entities.get(id))
    }

    /// Whether `side`'s princess tower on `lane` still stands.
    #[must_use]
    pub fn princess_standing(&self, side: PlayerId, lane: Lane) -> bool {
        self.towers[side].princess[lane.index()].is_some()
    }

    /// Whether `side` may place a card on cell `(x, y)`.
    ///
    /// Legal cells are in bounds, in the side's own half or an opened
    /// pocket, and not covered by a standing tower.
    #[must_use]
    pub fn is_legal_placement(&self, side: PlayerId, x: i32, y: i32) -> bool {
        if !self.layout.in_bounds(x, y) {
            return false;
        }
        let (x, y) = (x as u32, y as u32);
        let enemy = side.opponent();
        let territory = self.layout.in_own_half(side, y)
            || Lane::ALL.iter().any(|&lane| {
                !self.princess_standing(enemy, lane) && self.layout.in_pocket(side, lane, x, y)
            });
        if !territory {
            return false;
        }
        !PlayerId::both()
            .flat_map(|s| self.towers[s].all())
            .filter_map(|id| self.entities.get_running(id))
            .any(|tower| footprint_covers(tower.position, tower.stats().troop_size, x, y))
    }

    /// Placement legality for every cell, indexed `y * width + x`.
    #[must_use]
    pub fn placement_mask(&self, side: PlayerId) -> Vec<bool> {
        let (w, h) = (self.layout.width as i32, self.layout.height as i32);
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| self.is_legal_placement(side, x, y))
            .collect()
    }

    /// Validate and place `card` for `side` on cell `(x, y)`.
    pub fn place(&mut self, card: &Card, side: PlayerId, x: i32, y: i32) -> Result<Vec<EntityId>> {
        if !self.layout.in_bounds(x, y) {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.layout.width,
                height: self.layout.height,
            });
        }
        if !self.is_legal_placement(side, x, y) {
            return Err(EngineError::IllegalPlacement { x, y });
        }
        self.spawn(card, side, Position::cell_center(x as u32, y as u32))
    }

    /// Load and start every unit of `card` around `center`.
    ///
    /// All or nothing: if any unit fails to load or start, units already
    /// spawned are unloaded and the error is returned.
    pub fn spawn(&mut self, card: &Card, side: PlayerId, center: Position) -> Result<Vec<EntityId>> {
        let positions = self.unit_positions(card, center);
        let mut spawned = Vec::with_capacity(positions.len());

        for position in positions {
            let result = self
                .entities
                .load(Entity::new(card.clone(), side, position))
                .and_then(|id| self.entities.start(id).map(|()| id));
            match result {
                Ok(id) => spawned.push(id),
                Err(error) => {
                    warn!(card = %card, %side, %error, "spawn failed, rolling back");
                    for id in spawned {
                        if let Err(e) = self.entities.unload(id) {
                            warn!(entity = %id, error = %e, "rollback unload failed");
                        }
                    }
                    return Err(error);
                }
            }
        }

        debug!(card = %card, %side, x = center.x, y = center.y, units = spawned.len(), "spawned");
        Ok(spawned)
    }

    /// Multi-unit cards form a ring of radius 0.5 around the cell centre.
    fn unit_positions(&self, card: &Card, center: Position) -> Vec<Position> {
        let count = card.count.max(1);
        if count == 1 {
            return vec![center];
        }
        let (w, h) = (f64::from(self.layout.width), f64::from(self.layout.height));
        (0..count)
            .map(|k| {
                let angle = std::f64::consts::TAU * f64::from(k) / f64::from(count);
                Position::new(
                    (center.x + 0.5 * angle.cos()).clamp(0.0, w),
                    (center.y + 0.5 * angle.sin()).clamp(0.0, h),
                )
            })
            .collect()
    }

    /// Simulate `frames` frames starting at frame `start_frame`.
    pub fn step(&mut self, frames: u64, start_frame: u64) -> Vec<ArenaEvent> {
        let mut events = Vec::new();
        for offset in 0..frames {
            self.step_frame(start_frame + offset, &mut events);
        }
        events
    }

    fn step_frame(&mut self, frame: u64, events: &mut Vec<ArenaEvent>) {
        for id in self.entities.running_ids() {
            let Some(me) = self.entities.get_running(id) else {
                continue;
            };
            let ctx = FrameContext {
                entities: &self.entities,
                frame,
                fps: self.fps,
                objectives: &self.objectives,
            };
            let target = me.behavior.target.select(me, &ctx);
            if let Some(me) = self.entities.get_mut(id) {
                me.target = target;
            }

            let Some(me) = self.entities.get_running(id) else {
                continue;
            };
            let ctx = FrameContext {
                entities: &self.entities,
                frame,
                fps: self.fps,
                objectives: &self.objectives,
            };
            let strike = me.behavior.attack.attack(me, &ctx);
            let next = match strike {
                Some(_) => None,
                None => me.behavior.movement.next_position(me, &ctx, 1),
            };

            if let Some(strike) = strike {
                if let Some(me) = self.entities.get_mut(id) {
                    me.last_attack_frame = Some(frame);
                }
                self.resolve_strike(strike, events);
            } else if let Some(position) = next {
                if let Some(me) = self.entities.get_mut(id) {
                    me.position = position;
                }
            }
        }
    }

    fn resolve_strike(&mut self, strike: Strike, events: &mut Vec<ArenaEvent>) {
        for hit in strike.hits {
            let Some(victim) = self.entities.get_mut(hit.entity) else {
                continue;
            };
            let killed = victim.take_damage(hit.damage);
            let (side, kind, dormant) = (victim.side, victim.kind, victim.dormant);
            if killed {
                self.destroy(hit.entity, events);
            } else if dormant && kind == EntityKind::Tower(TowerKind::King) {
                self.activate_king(side, events);
            }
        }
    }

    fn activate_king(&mut self, side: PlayerId, events: &mut Vec<ArenaEvent>) {
        let Some(id) = self.towers[side].king else {
            return;
        };
        if let Some(king) = self.entities.get_mut(id) {
            if king.dormant {
                king.dormant = false;
                debug!(%side, "king tower activated");
                events.push(ArenaEvent::KingActivated { side });
            }
        }
    }

    /// Remove a dead entity and settle tower bookkeeping.
    fn destroy(&mut self, id: EntityId, events: &mut Vec<ArenaEvent>) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let (side, kind, card) = (entity.side, entity.kind, entity.card.id());
        if let Err(error) = self.entities.unload(id) {
            warn!(entity = %id, %error, "unload hook failed on death");
        }
        debug!(entity = %id, %side, %card, "entity destroyed");
        events.push(ArenaEvent::EntityDestroyed {
            entity: id,
            side,
            card,
        });

        let EntityKind::Tower(tower) = kind else {
            return;
        };
        events.push(ArenaEvent::TowerDestroyed { side, tower });
        match tower {
            TowerKind::Princess => {
                for slot in &mut self.towers[side].princess {
                    if *slot == Some(id) {
                        *slot = None;
                    }
                }
                self.activate_king(side, events);
            }
            TowerKind::King => {
                self.towers[side].king = None;
                let remaining: Vec<EntityId> =
                    self.towers[side].princess.iter().flatten().copied().collect();
                for princess in remaining {
                    if let Some(tower) = self.entities.get_mut(princess) {
                        tower.health = 0;
                    }
                    self.destroy(princess, events);
                }
            }
        }
    }
}
