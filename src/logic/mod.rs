//! Per-entity behavior components: targeting, attacking and movement.
//!
//! Components are pure: they read a frame snapshot through `FrameContext`
//! and return a decision. The arena applies decisions, so one entity's
//! update never holds a borrow of another.
//!
//! Each card picks one variant per component. Dispatch is by enum so
//! `Behavior` stays `Copy` and serializable.

pub mod attack;
pub mod movement;
pub mod target;

use serde::{Deserialize, Serialize};

use crate::core::{PlayerMap, Position};
use crate::entities::EntityCollection;

pub use attack::{Attack, AttackLogic, Hit, SingleAttack, SplashAttack, Strike, RANGE_TOLERANCE};
pub use movement::{Movement, MovementLogic, SimpleMovement};
pub use target::{RadiusTarget, Target, TargetLogic};

/// Read-only view of the arena for one entity update.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    pub entities: &'a EntityCollection,

    /// Frame being simulated.
    pub frame: u64,

    pub fps: u32,

    /// Where each side's troops head when they have no target.
    pub objectives: &'a PlayerMap<Position>,
}

/// The components an entity runs every frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub target: TargetLogic,
    pub attack: AttackLogic,
    pub movement: MovementLogic,
}

impl Behavior {
    /// Nearest-target, single-hit, walking.
    #[must_use]
    pub fn troop() -> Self {
        Self {
            target: TargetLogic::Radius(RadiusTarget),
            attack: AttackLogic::Single(SingleAttack),
            movement: MovementLogic::Simple(SimpleMovement),
        }
    }

    /// Walking troop whose hits damage everything near the target.
    #[must_use]
    pub fn splash_troop(radius: f64) -> Self {
        Self {
            attack: AttackLogic::Splash(SplashAttack { radius }),
            ..Self::troop()
        }
    }

    /// Buildings and towers: they shoot but never move.
    #[must_use]
    pub fn structure() -> Self {
        Self {
            movement: MovementLogic::Stationary,
            ..Self::troop()
        }
    }
}
