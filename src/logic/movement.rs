//! Movement towards the current objective.

use serde::{Deserialize, Serialize};

use super::attack::RANGE_TOLERANCE;
use super::FrameContext;
use crate::core::Position;
use crate::entities::Entity;

pub trait Movement {
    /// Where `me` ends up after `frames` frames, or `None` if it stays put.
    fn next_position(&self, me: &Entity, ctx: &FrameContext<'_>, frames: u64) -> Option<Position>;
}

/// Straight line towards the target, or the side's objective when there is
/// none. Stops at attack range rather than walking into the objective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMovement;

impl Movement for SimpleMovement {
    fn next_position(&self, me: &Entity, ctx: &FrameContext<'_>, frames: u64) -> Option<Position> {
        let stats = me.stats();
        let goal = me
            .target
            .and_then(|id| ctx.entities.get_running(id))
            .map_or(ctx.objectives[me.side], |target| target.position);

        let distance = me.position.distance(goal);
        let remaining = distance - stats.attack_range;
        if remaining <= RANGE_TOLERANCE {
            return None;
        }
        let step = stats.speed / f64::from(ctx.fps) * frames as f64;
        if step <= 0.0 {
            return None;
        }
        Some(me.position.toward(goal, step.min(remaining)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementLogic {
    Simple(SimpleMovement),
    Stationary,
}

impl Movement for MovementLogic {
    fn next_position(&self, me: &Entity, ctx: &FrameContext<'_>, frames: u64) -> Option<Position> {
        match self {
            MovementLogic::Simple(logic) => logic.next_position(me, ctx, frames),
            MovementLogic::Stationary => None,
        }
    }
}
