//! Target selection.

use serde::{Deserialize, Serialize};

use super::FrameContext;
use crate::entities::{Entity, EntityId};

/// Picks which enemy an entity is interested in this frame.
pub trait Target {
    /// `None` when nothing qualifies. Dormant entities never select.
    fn select(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<EntityId>;
}

/// Nearest running enemy within sight range that passes the target filter.
///
/// Candidates are scanned in collection order and only a strictly closer
/// one replaces the current best, so equidistant enemies resolve to the
/// one loaded first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusTarget;

impl Target for RadiusTarget {
    fn select(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<EntityId> {
        if me.dormant {
            return None;
        }
        let stats = me.stats();
        let mut best: Option<(f64, EntityId)> = None;

        for other in ctx.entities.running() {
            if other.side == me.side || other.id == me.id {
                continue;
            }
            if !stats.targets.allows(other.is_air(), other.kind.is_structure()) {
                continue;
            }
            let distance = me.position.distance(other.position);
            if distance > stats.sight_range {
                continue;
            }
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, other.id)),
            }
        }

        best.map(|(_, id)| id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLogic {
    Radius(RadiusTarget),
}

impl Target for TargetLogic {
    fn select(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<EntityId> {
        match self {
            TargetLogic::Radius(logic) => logic.select(me, ctx),
        }
    }
}
