use foxgrove_engine::{DefDatabase, LevelDef, Viewport};
use thiserror::Error;
use tracing::{info, warn};

use super::commands::WorldCommand;
use super::enemy::{Enemy, EnemyTier, Race};
use super::props::{Prop, PropKind, Tree};
use super::tuning::SimTuning;
use super::world::World;

/// Placements with this kind become trees rather than props.
const TREE_KIND: &str = "Tree";

#[derive(Debug, Error)]
pub enum LevelBuildError {
    #[error("unknown level: {0}")]
    UnknownLevel(String),
    #[error("content has no levels")]
    NoLevels,
    #[error("level {level} references unknown area {area}")]
    UnknownArea { level: String, area: String },
    #[error("level {level} references unknown enemy def {def_name}")]
    UnknownEnemyDef { level: String, def_name: String },
    #[error("enemy def {def_name} has unknown race {race}")]
    UnknownRace { def_name: String, race: String },
    #[error("enemy def {def_name} has unknown tier {tier}")]
    UnknownTier { def_name: String, tier: String },
    #[error("trigger {trigger} has unsupported effect {effect} (target {target})")]
    InvalidTriggerEffect {
        trigger: String,
        effect: String,
        target: String,
    },
}

/// Builds the first level in content order.
pub fn build_first_world(
    db: &DefDatabase,
    tuning: SimTuning,
    viewport: Viewport,
) -> Result<World, LevelBuildError> {
    let Some(level) = db.level_defs().first() else {
        return Err(LevelBuildError::NoLevels);
    };
    build_level(db, level, tuning, viewport)
}

pub fn build_world(
    db: &DefDatabase,
    level_name: &str,
    tuning: SimTuning,
    viewport: Viewport,
) -> Result<World, LevelBuildError> {
    let Some(level) = db.level_def(level_name) else {
        return Err(LevelBuildError::UnknownLevel(level_name.to_string()));
    };
    build_level(db, level, tuning, viewport)
}

fn build_level(
    db: &DefDatabase,
    level: &LevelDef,
    tuning: SimTuning,
    viewport: Viewport,
) -> Result<World, LevelBuildError> {
    let Some(area) = db.area_def_by_name(&level.area) else {
        return Err(LevelBuildError::UnknownArea {
            level: level.def_name.clone(),
            area: level.area.clone(),
        });
    };
    let mut world = World::new(area.clone(), level.hero_start, tuning, viewport)
        .with_areas(db.area_defs().to_vec());

    for placement in &level.props {
        let footprint = placement.size * placement.scale;
        if placement.kind == TREE_KIND {
            world.add_tree(Tree::new(placement.position, footprint));
            continue;
        }
        let kind = PropKind::parse(&placement.kind);
        if kind == PropKind::Unknown {
            warn!(
                level = %level.def_name,
                kind = %placement.kind,
                "unknown_prop_kind_defaults_to_block"
            );
        }
        let prop = Prop::new(world.next_prop_id(), kind, placement.position, footprint)
            .with_group(placement.group.clone())
            .with_reward(placement.reward.clone())
            .with_spawned(placement.spawned);
        world.add_prop(prop);
    }

    for placement in &level.trees {
        world.add_tree(Tree::new(
            placement.position,
            placement.size * placement.scale,
        ));
    }

    for placement in &level.enemies {
        let Some(def) = db.enemy_def_by_name(&placement.def_name) else {
            return Err(LevelBuildError::UnknownEnemyDef {
                level: level.def_name.clone(),
                def_name: placement.def_name.clone(),
            });
        };
        let Some(race) = Race::parse(&def.race) else {
            return Err(LevelBuildError::UnknownRace {
                def_name: def.def_name.clone(),
                race: def.race.clone(),
            });
        };
        let Some(tier) = EnemyTier::parse(&def.tier) else {
            return Err(LevelBuildError::UnknownTier {
                def_name: def.def_name.clone(),
                tier: def.tier.clone(),
            });
        };
        let enemy = Enemy::from_def(
            world.next_enemy_id(),
            def,
            race,
            tier,
            placement.position,
            world.tuning(),
        );
        world.add_enemy(enemy);
    }

    for trigger in &level.triggers {
        let Some(command) = WorldCommand::from_effect(&trigger.effect, &trigger.target) else {
            return Err(LevelBuildError::InvalidTriggerEffect {
                trigger: trigger.id.clone(),
                effect: trigger.effect.clone(),
                target: trigger.target.clone(),
            });
        };
        world.add_trigger(trigger.id.clone(), trigger.rect, command, trigger.once);
    }

    info!(
        level = %level.def_name,
        area = %world.area().def_name,
        props = world.props().len(),
        trees = world.trees().len(),
        enemies = world.enemies().len(),
        triggers = world.triggers().len(),
        "world_built"
    );
    Ok(world)
}
