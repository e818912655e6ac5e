use foxgrove_engine::{AreaDef, InputSnapshot, Rect, Vec2, Viewport};
use tracing::{debug, info, warn};

use super::actor::{MobileActor, Pose};
use super::commands::{CommandApplyStats, WorldCommand, WorldCommandQueue};
use super::enemy::{Enemy, EnemyId, EnemyTickContext, EnemyTier, HeroView};
use super::events::{SimEvent, SimEventBus, SimEventCounts};
use super::hero::{Hero, HeroTickContext};
use super::mood::Mood;
use super::progress::WorldProgress;
use super::props::{Prop, PropId, Tree};
use super::triggers::{TriggerId, TriggerZone};
use super::tuning::SimTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub mood: Mood,
    pub interactable_in_range: bool,
    pub alive: bool,
    pub pose: Pose,
}

/// Owns every simulated entity of the loaded level. `tick` is the only way
/// time advances.
#[derive(Debug)]
pub struct World {
    area: AreaDef,
    areas: Vec<AreaDef>,
    viewport: Viewport,
    tuning: SimTuning,
    hero: Hero,
    enemies: Vec<Enemy>,
    props: Vec<Prop>,
    trees: Vec<Tree>,
    triggers: Vec<TriggerZone>,
    progress: WorldProgress,
    events: SimEventBus,
    commands: WorldCommandQueue,
    tick_count: u64,
}

impl World {
    /// `hero_start` is the top-left corner of the hero's body in world units.
    /// Tuning that fails validation is replaced by the defaults.
    pub fn new(area: AreaDef, hero_start: Vec2, tuning: SimTuning, viewport: Viewport) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                warn!(error = %err, "invalid_tuning_using_defaults");
                SimTuning::default()
            }
        };
        let hero = Hero::new(hero_start, viewport, &tuning);
        Self {
            areas: vec![area.clone()],
            area,
            viewport,
            tuning,
            hero,
            enemies: Vec::new(),
            props: Vec::new(),
            trees: Vec::new(),
            triggers: Vec::new(),
            progress: WorldProgress::default(),
            events: SimEventBus::default(),
            commands: WorldCommandQueue::default(),
            tick_count: 0,
        }
    }

    /// Areas reachable through `SwitchArea` commands; the current area is
    /// always kept.
    pub fn with_areas(mut self, areas: Vec<AreaDef>) -> Self {
        self.areas = areas;
        if !self
            .areas
            .iter()
            .any(|area| area.def_name == self.area.def_name)
        {
            self.areas.push(self.area.clone());
        }
        self
    }

    pub fn next_prop_id(&self) -> PropId {
        PropId(self.props.len() as u32)
    }

    pub fn next_enemy_id(&self) -> EnemyId {
        EnemyId(self.enemies.len() as u32)
    }

    pub fn add_prop(&mut self, prop: Prop) -> PropId {
        let id = prop.id();
        self.props.push(prop);
        id
    }

    pub fn add_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Normal-tier enemies are registered with their race's kill tally.
    pub fn add_enemy(&mut self, enemy: Enemy) -> EnemyId {
        if enemy.tier() == EnemyTier::Normal {
            self.progress.register(enemy.race());
        }
        let id = enemy.id();
        self.enemies.push(enemy);
        id
    }

    pub fn add_trigger(
        &mut self,
        name: impl Into<String>,
        rect: Rect,
        command: WorldCommand,
        once: bool,
    ) -> TriggerId {
        let id = TriggerId(self.triggers.len() as u32);
        self.triggers
            .push(TriggerZone::new(id, name, rect, command).with_once(once));
        id
    }

    pub fn enqueue_command(&mut self, command: WorldCommand) {
        self.commands.enqueue(command);
    }

    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let legal = self.area.legal_rect();

        let mut hero_ctx = HeroTickContext {
            dt,
            input,
            viewport: self.viewport,
            legal,
            props: &mut self.props,
            trees: &self.trees,
            enemies: &mut self.enemies,
            tuning: &self.tuning,
            events: &mut self.events,
        };
        self.hero.tick(&mut hero_ctx);

        self.evaluate_triggers();
        self.tick_enemies(dt, legal);
        for prop in &mut self.props {
            prop.tick(dt, self.tuning.interaction_seconds);
        }
        self.commit_commands();

        self.tick_count = self.tick_count.saturating_add(1);
        debug!(
            tick = self.tick_count,
            health = self.hero.vitals().health(),
            mood = self.hero.mood().as_str(),
            pose = self.hero.pose().as_str(),
            events = self.events.iter_emitted_so_far().count(),
            "world_tick"
        );
        self.events.finish_tick_rollover();
    }

    fn evaluate_triggers(&mut self) {
        if !self.hero.is_alive() {
            return;
        }
        let body = self.hero.body_rect();
        for zone in &mut self.triggers {
            let Some(command) = zone.evaluate(&body) else {
                continue;
            };
            self.events.emit(SimEvent::TriggerFired { zone: zone.id() });
            debug!(zone = zone.name(), command = ?command, "trigger_fired");
            self.commands.enqueue(command);
        }
    }

    fn tick_enemies(&mut self, dt: f32, legal: Rect) {
        let hero = HeroView {
            body: self.hero.body_rect(),
            alive: self.hero.is_alive(),
        };
        for index in 0..self.enemies.len() {
            let (before, rest) = self.enemies.split_at_mut(index);
            let Some((enemy, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = EnemyTickContext {
                dt,
                hero,
                others_before: before,
                others_after: after,
                props: &mut self.props,
                trees: &self.trees,
                legal,
                progress: &mut self.progress,
                events: &mut self.events,
                tuning: &self.tuning,
            };
            enemy.tick(&mut ctx);
        }
    }

    fn commit_commands(&mut self) {
        let mut stats = CommandApplyStats::default();
        for command in self.commands.drain_current_tick() {
            stats.record_command(command.kind());
            match &command {
                WorldCommand::SpawnProps { group } | WorldCommand::DespawnProps { group } => {
                    let spawned = matches!(command, WorldCommand::SpawnProps { .. });
                    let mut toggled = 0u32;
                    for prop in self
                        .props
                        .iter_mut()
                        .filter(|prop| prop.group() == Some(group.as_str()))
                    {
                        prop.flags.spawned = spawned;
                        toggled = toggled.saturating_add(1);
                    }
                    if toggled == 0 {
                        stats.record_invalid_target();
                        debug!(group = %group, spawned, "world_command_invalid_target");
                    } else {
                        stats.record_props_toggled(toggled);
                    }
                }
                WorldCommand::SwitchArea { area } => {
                    let Some(next) = self
                        .areas
                        .iter()
                        .find(|candidate| candidate.def_name == *area)
                        .cloned()
                    else {
                        stats.record_invalid_target();
                        debug!(area = %area, "world_command_invalid_target");
                        continue;
                    };
                    self.switch_area(next);
                }
            }
        }
        self.commands.set_last_tick_apply_stats(stats);
    }

    fn switch_area(&mut self, next: AreaDef) {
        let legal = next.legal_rect();
        let body = self.hero.body_rect();
        if !legal.contains_rect(&body) {
            let origin = Vec2::new(
                body.x.clamp(legal.x, (legal.right() - body.width).max(legal.x)),
                body.y.clamp(legal.y, (legal.bottom() - body.height).max(legal.y)),
            );
            self.hero.place_body_at(origin);
        }
        self.events.emit(SimEvent::AreaChanged { area: next.id });
        info!(from = %self.area.def_name, to = %next.def_name, "area_changed");
        self.area = next;
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn hero_mut(&mut self) -> &mut Hero {
        &mut self.hero
    }

    pub fn set_hero_invulnerable(&mut self, invulnerable: bool) {
        self.hero.set_invulnerable(invulnerable);
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id() == id)
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn prop(&self, id: PropId) -> Option<&Prop> {
        self.props.iter().find(|prop| prop.id() == id)
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn triggers(&self) -> &[TriggerZone] {
        &self.triggers
    }

    pub fn progress(&self) -> &WorldProgress {
        &self.progress
    }

    pub fn events(&self) -> &SimEventBus {
        &self.events
    }

    pub fn last_tick_event_counts(&self) -> SimEventCounts {
        self.events.last_tick_counts()
    }

    pub fn last_tick_apply_stats(&self) -> &CommandApplyStats {
        self.commands.last_tick_apply_stats()
    }

    pub fn area(&self) -> &AreaDef {
        &self.area
    }

    pub fn legal_rect(&self) -> Rect {
        self.area.legal_rect()
    }

    pub fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            health: self.hero.vitals().health(),
            max_health: self.hero.vitals().max_health(),
            mood: self.hero.mood(),
            interactable_in_range: self.hero.interactable_in_range().is_some(),
            alive: self.hero.is_alive(),
            pose: self.hero.pose(),
        }
    }
}
