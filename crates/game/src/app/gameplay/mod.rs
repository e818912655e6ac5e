mod actor;
mod bounds;
mod collision;
mod combat;
mod commands;
mod enemy;
mod events;
mod hero;
mod level;
mod mood;
mod motion;
mod progress;
mod props;
mod triggers;
mod tuning;
mod vitals;
mod world;

pub use actor::{ActivityFlags, MobileActor, Pose};
pub use bounds::clamp_to_bounds;
pub use collision::{resolve_static, try_push, PushOutcome, StaticContext, StaticOutcome};
pub use combat::{attack_connects, AttackPhase, AttackWindow, ContactOutcome, ContactSource, DamageClock};
pub use commands::{CommandApplyStats, WorldCommand, WorldCommandKind, WorldCommandQueue};
pub use enemy::{AiState, Enemy, EnemyId, EnemyTier, Projectile, Race};
pub use events::{SimEvent, SimEventBus, SimEventCounts, SimEventKind};
pub use hero::Hero;
pub use level::{build_first_world, build_world, LevelBuildError};
pub use mood::{classify, Mood};
pub use motion::{intent_direction, step, CorrectionReason, Kinematics};
pub use progress::{RaceTally, WorldProgress};
pub use props::{CollisionPolicy, Prop, PropFlags, PropId, PropKind, Tree};
pub use triggers::{TriggerId, TriggerZone};
pub use tuning::{SimTuning, TuningError};
pub use vitals::{heal_reward_for, hero_alive, HealOverTime, SleepClock, Vitals, HERO_DEATH_THRESHOLD};
pub use world::{HudSnapshot, World};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
