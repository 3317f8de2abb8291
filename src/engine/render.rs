//! Renderer-facing snapshot of a match.
//!
//! The engine never draws. It hands a `FrameView` to whatever `Renderer`
//! the caller supplies.

use serde::{Deserialize, Serialize};

use crate::cards::EntityKind;
use crate::core::{PlayerId, Position};
use crate::entities::{Entity, EntityId};

/// What a renderer needs to know about one running entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub side: PlayerId,
    pub kind: EntityKind,
    pub card: String,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub troop_size: f64,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            side: entity.side,
            kind: entity.kind,
            card: entity.card.name.clone(),
            position: entity.position,
            health: entity.health,
            max_health: entity.stats().max_health,
            troop_size: entity.stats().troop_size,
        }
    }
}

/// Everything visible on one frame, from one side's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub perspective: PlayerId,
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    pub resolution: (u32, u32),
    pub entities: Vec<EntityView>,
}

/// Turns a frame snapshot into an image or any other observation.
pub trait Renderer {
    type Output;

    fn render(&mut self, view: &FrameView) -> Self::Output;
}

/// Cell occupancy grid, `height` rows of `width` cells.
///
/// Cells hold 0 when empty, 1 for the viewer's entities and 2 for the
/// opponent's. Side 1's view is flipped so each side sees itself at the
/// bottom.
#[derive(Clone, Copy, Debug, Default)]
pub struct OccupancyRenderer;

impl Renderer for OccupancyRenderer {
    type Output = Vec<u8>;

    fn render(&mut self, view: &FrameView) -> Vec<u8> {
        let (w, h) = (view.width as usize, view.height as usize);
        let mut grid = vec![0u8; w * h];
        for entity in &view.entities {
            let mut position = entity.position;
            if view.perspective != PlayerId::BLUE {
                position = position.mirrored(f64::from(view.height));
            }
            let x = (position.x.max(0.0) as usize).min(w.saturating_sub(1));
            let y = (position.y.max(0.0) as usize).min(h.saturating_sub(1));
            grid[y * w + x] = if entity.side == view.perspective { 1 } else { 2 };
        }
        grid
    }
}
