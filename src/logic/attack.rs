//! Attack resolution.
//!
//! An attack fires when the entity has a running target within attack range
//! and its cooldown has elapsed. The first attack has no cooldown.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::FrameContext;
use crate::entities::{Entity, EntityId};

/// Slack on the range check so that movement clamped to exactly
/// `attack_range` still counts as in range.
pub const RANGE_TOLERANCE: f64 = 1e-6;

/// Damage dealt to one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub entity: EntityId,
    pub damage: i32,
}

/// Everything one attack does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Strike {
    pub hits: SmallVec<[Hit; 4]>,
}

pub trait Attack {
    /// Whether `me` may attack its current target this frame.
    fn can_attack(&self, me: &Entity, ctx: &FrameContext<'_>) -> bool {
        if me.dormant {
            return false;
        }
        let Some(target) = me.target.and_then(|id| ctx.entities.get_running(id)) else {
            return false;
        };
        if me.position.distance(target.position) > me.stats().attack_range + RANGE_TOLERANCE {
            return false;
        }
        match me.last_attack_frame {
            None => true,
            Some(last) => {
                ctx.frame.saturating_sub(last) >= u64::from(me.stats().attack_delay)
            }
        }
    }

    /// The hits an attack would land, or `None` if it cannot fire.
    fn attack(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<Strike>;
}

/// Damages the target only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleAttack;

impl Attack for SingleAttack {
    fn attack(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<Strike> {
        if !self.can_attack(me, ctx) {
            return None;
        }
        let target = me.target?;
        let mut strike = Strike::default();
        strike.hits.push(Hit {
            entity: target,
            damage: me.stats().damage,
        });
        Some(strike)
    }
}

/// Damages every enemy the attacker could target within `radius` of the
/// primary target, the target included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplashAttack {
    pub radius: f64,
}

impl Attack for SplashAttack {
    fn attack(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<Strike> {
        if !self.can_attack(me, ctx) {
            return None;
        }
        let center = ctx.entities.get_running(me.target?)?.position;
        let stats = me.stats();
        let hits = ctx
            .entities
            .running()
            .filter(|other| other.side != me.side)
            .filter(|other| stats.targets.allows(other.is_air(), other.kind.is_structure()))
            .filter(|other| other.position.distance(center) <= self.radius + RANGE_TOLERANCE)
            .map(|other| Hit {
                entity: other.id,
                damage: stats.damage,
            })
            .collect();
        Some(Strike { hits })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttackLogic {
    Single(SingleAttack),
    Splash(SplashAttack),
}

impl Attack for AttackLogic {
    fn can_attack(&self, me: &Entity, ctx: &FrameContext<'_>) -> bool {
        match self {
            AttackLogic::Single(logic) => logic.can_attack(me, ctx),
            AttackLogic::Splash(logic) => logic.can_attack(me, ctx),
        }
    }

    fn attack(&self, me: &Entity, ctx: &FrameContext<'_>) -> Option<Strike> {
        match self {
            AttackLogic::Single(logic) => logic.attack(me, ctx),
            AttackLogic::Splash(logic) => logic.attack(me, ctx),
        }
    }
}
