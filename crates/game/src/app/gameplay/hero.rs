use foxgrove_engine::{Direction, InputAction, InputSnapshot, Rect, Vec2, Viewport};
use tracing::{debug, info};

use super::actor::{attack_rect_for, body_rect_for, ActivityFlags, MobileActor};
use super::bounds::clamp_to_bounds;
use super::collision::{resolve_static, StaticContext};
use super::combat::{attack_connects, AttackPhase, AttackWindow, ContactSource, DamageClock};
use super::enemy::Enemy;
use super::events::{SimEvent, SimEventBus};
use super::mood::{classify, Mood};
use super::motion::{intent_direction, step, Kinematics};
use super::props::{Prop, PropId, Tree};
use super::tuning::SimTuning;
use super::vitals::{heal_reward_for, hero_alive, HealOverTime, SleepClock, Vitals};

pub(crate) struct HeroTickContext<'a> {
    pub dt: f32,
    pub input: &'a InputSnapshot,
    pub viewport: Viewport,
    pub legal: Rect,
    pub props: &'a mut [Prop],
    pub trees: &'a [Tree],
    pub enemies: &'a mut [Enemy],
    pub tuning: &'a SimTuning,
    pub events: &'a mut SimEventBus,
}

/// The player-controlled actor. Its world position doubles as the camera
/// origin; the body is drawn at a fixed screen anchor, so every rectangle is
/// `world position + screen anchor` based.
#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    kinematics: Kinematics,
    screen_anchor: Vec2,
    frame: Vec2,
    scale: f32,
    vitals: Vitals,
    flags: ActivityFlags,
    facing: Direction,
    mood: Mood,
    attack: AttackWindow,
    damage: DamageClock,
    healing: HealOverTime,
    sleep: SleepClock,
    footstep_timer: f32,
    colliding: bool,
    interactable_in_range: Option<PropId>,
    interaction: Option<PropId>,
    alive: bool,
    invulnerable: bool,
}

impl Hero {
    /// Places the hero so its body's top-left corner sits at `body_origin`.
    pub fn new(body_origin: Vec2, viewport: Viewport, tuning: &SimTuning) -> Self {
        let frame = tuning.hero_frame_size;
        let scale = tuning.hero_scale;
        let screen_anchor = screen_anchor_for(viewport, frame, scale);
        let position = body_origin - screen_anchor - frame * 0.5;
        let vitals = Vitals::new(tuning.hero_max_health);
        Self {
            kinematics: Kinematics::new(position),
            screen_anchor,
            frame,
            scale,
            vitals,
            flags: ActivityFlags::default(),
            facing: Direction::Down,
            mood: classify(vitals.health(), false, false, false).unwrap_or(Mood::Content),
            attack: AttackWindow::new(tuning.attack_active_seconds, tuning.attack_cycle_seconds),
            damage: DamageClock::new(tuning.hurt_window_seconds, tuning.damage_interval_seconds),
            healing: HealOverTime::default(),
            sleep: SleepClock::default(),
            footstep_timer: 0.0,
            colliding: false,
            interactable_in_range: None,
            interaction: None,
            alive: hero_alive(&vitals),
            invulnerable: false,
        }
    }

    pub fn screen_anchor(&self) -> Vec2 {
        self.screen_anchor
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Dead heroes and heroes mid-interaction cannot move or attack.
    pub fn is_locked(&self) -> bool {
        !self.alive || self.interaction.is_some()
    }

    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    pub fn interactable_in_range(&self) -> Option<PropId> {
        self.interactable_in_range
    }

    pub fn interaction(&self) -> Option<PropId> {
        self.interaction
    }

    pub fn attack_phase(&self) -> AttackPhase {
        self.attack.phase()
    }

    pub fn damage_clock(&self) -> &DamageClock {
        &self.damage
    }

    pub fn healing(&self) -> &HealOverTime {
        &self.healing
    }

    pub fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    pub fn set_invulnerable(&mut self, invulnerable: bool) {
        self.invulnerable = invulnerable;
    }

    /// Moves the body's top-left corner to `body_origin` without leaving a
    /// revertable previous position behind.
    pub fn place_body_at(&mut self, body_origin: Vec2) {
        let position = body_origin - self.screen_anchor - self.frame * 0.5;
        self.kinematics.teleport(position);
        self.interaction = None;
        self.interactable_in_range = None;
        self.colliding = false;
    }

    /// Keeps the body in place in world space when the viewport changes.
    fn refresh_anchor(&mut self, viewport: Viewport) {
        let anchor = screen_anchor_for(viewport, self.frame, self.scale);
        if anchor == self.screen_anchor {
            return;
        }
        let shift = self.screen_anchor - anchor;
        self.kinematics.teleport(self.kinematics.position() + shift);
        self.screen_anchor = anchor;
    }

    pub(crate) fn tick(&mut self, ctx: &mut HeroTickContext<'_>) {
        let dt = ctx.dt;
        let input = ctx.input;
        self.refresh_anchor(ctx.viewport);
        let locked = self.is_locked();

        let intent = input.axis_intent();
        if !locked {
            if let Some(facing) = Direction::from_dominant_axis(intent_direction(intent)) {
                self.facing = facing;
            }
        }

        let moving = !locked && intent != (0, 0);
        self.flags.walking = moving;
        self.flags.running = moving && input.is_down(InputAction::Run);
        if moving {
            self.flags.sleeping = false;
        } else if !locked && input.was_pressed(InputAction::Sleep) {
            self.flags.sleeping = !self.flags.sleeping;
        }

        self.attack
            .tick(dt, input.is_down(InputAction::Attack), locked);
        self.flags.attacking = self.attack.is_active();
        if self.flags.attacking {
            self.flags.sleeping = false;
        }

        let speed = ctx.tuning.hero_speed(self.flags.running, self.colliding);
        step(&mut self.kinematics, intent_direction(intent), speed, locked);
        clamp_to_bounds(self, &ctx.legal);

        self.finish_interaction(ctx.props, ctx.events);
        let statics = StaticContext {
            legal: ctx.legal,
            motion: self.kinematics.delta(),
            can_push: true,
            trees: ctx.trees,
        };
        let outcome = resolve_static(self, &statics, ctx.props);
        for prop in &outcome.pushed {
            ctx.events.emit(SimEvent::PushPerformed { prop: *prop });
        }
        let moved = self.kinematics.delta() != Vec2::ZERO;
        self.advance_footsteps(moved, dt, ctx.tuning, ctx.events);
        self.colliding = outcome.pushing;
        self.flags.pushing = outcome.pushing;
        self.interactable_in_range = outcome.interactable_in_range;
        if !locked && input.was_pressed(InputAction::Interact) {
            self.start_interaction(ctx.props, ctx.events);
        }

        self.damage.advance(dt);
        for enemy in ctx.enemies.iter_mut() {
            self.resolve_enemy(enemy, ctx.tuning, ctx.events);
        }
        self.flags.hurting = self.damage.hurting();
        if self.flags.hurting {
            self.flags.sleeping = false;
        }

        if let Some(mood) = classify(
            self.vitals.health(),
            self.flags.attacking,
            self.flags.hurting,
            self.flags.sleeping,
        ) {
            self.mood = mood;
        }

        self.sleep
            .tick(dt, self.flags.sleeping, ctx.tuning, &mut self.vitals);
        self.healing.tick(
            dt,
            ctx.tuning.heal_increment,
            ctx.tuning.heal_interval_seconds,
            &mut self.vitals,
        );

        self.update_alive(ctx.events);
    }

    fn advance_footsteps(&mut self, moved: bool, dt: f32, tuning: &SimTuning, events: &mut SimEventBus) {
        if !moved {
            self.footstep_timer = 0.0;
            return;
        }
        self.footstep_timer += dt;
        if self.footstep_timer >= tuning.footstep_cadence(self.flags.running) {
            self.footstep_timer = 0.0;
            events.emit(SimEvent::Footstep {
                running: self.flags.running,
            });
        }
    }

    fn start_interaction(&mut self, props: &mut [Prop], events: &mut SimEventBus) {
        if self.interaction.is_some() {
            return;
        }
        let Some(prop_id) = self.interactable_in_range else {
            return;
        };
        let Some(prop) = props.iter_mut().find(|prop| prop.id() == prop_id) else {
            return;
        };
        prop.flags.active = true;
        self.interaction = Some(prop_id);
        self.flags.sleeping = false;
        events.emit(SimEvent::InteractionStarted { prop: prop_id });
        debug!(prop = prop_id.0, kind = prop.kind().as_str(), "interaction_started");
    }

    /// Releases the interaction latch once the prop reports opened, or when the
    /// prop is gone.
    fn finish_interaction(&mut self, props: &mut [Prop], events: &mut SimEventBus) {
        let Some(prop_id) = self.interaction else {
            return;
        };
        let Some(prop) = props
            .iter_mut()
            .find(|prop| prop.id() == prop_id && prop.flags.spawned)
        else {
            self.interaction = None;
            return;
        };
        if !prop.flags.opened {
            return;
        }
        prop.flags.active = false;
        if prop.kind().resets_after_interaction() {
            prop.flags.opened = false;
        } else {
            prop.flags.interactable = false;
        }
        self.interaction = None;
        events.emit(SimEvent::InteractionFinished { prop: prop_id });
        info!(
            prop = prop_id.0,
            kind = prop.kind().as_str(),
            reward = prop.reward().unwrap_or("none"),
            "interaction_finished"
        );
    }

    fn resolve_enemy(&mut self, enemy: &mut Enemy, tuning: &SimTuning, events: &mut SimEventBus) {
        if !enemy.participates_in_combat() {
            return;
        }
        if !enemy.is_dying() && enemy.body_rect().overlaps(&self.body_rect()) {
            self.take_contact(enemy.contact_source(), tuning, events);
        }
        if attack_connects(&*self, &*enemy) && enemy.receive_hit(tuning) {
            events.emit(SimEvent::AttackConnected { enemy: enemy.id() });
            debug!(
                enemy = enemy.id().0,
                health = enemy.vitals().health(),
                "attack_connected"
            );
        }
        if attack_connects(&*enemy, &*self) {
            let source = enemy.attack_source();
            self.take_contact(source, tuning, events);
            if source == ContactSource::Projectile {
                enemy.clear_projectile();
            }
        }
        if enemy.claim_heal_reward() {
            let amount = heal_reward_for(enemy.vitals().max_health(), tuning);
            self.healing.activate(amount);
            events.emit(SimEvent::HealRewardGranted { amount });
            info!(enemy = enemy.id().0, amount, "heal_reward_granted");
        }
    }

    fn take_contact(&mut self, source: ContactSource, tuning: &SimTuning, events: &mut SimEventBus) {
        if self.invulnerable || !self.alive {
            return;
        }
        let outcome = self.damage.contact(source.damage(tuning), &mut self.vitals);
        if outcome.hurting {
            self.flags.sleeping = false;
        }
        if let Some(amount) = outcome.applied {
            self.flags.sleeping = false;
            events.emit(SimEvent::DamageTaken {
                amount,
                health: self.vitals.health(),
            });
            debug!(amount, health = self.vitals.health(), "damage_taken");
        }
    }

    fn update_alive(&mut self, events: &mut SimEventBus) {
        let alive = hero_alive(&self.vitals);
        if self.alive && !alive {
            events.emit(SimEvent::HeroDied);
            info!(health = self.vitals.health(), "hero_died");
        }
        self.alive = alive;
        self.flags.dying = !alive;
        if !alive {
            self.interaction = None;
            self.flags.sleeping = false;
        }
    }
}

fn screen_anchor_for(viewport: Viewport, frame: Vec2, scale: f32) -> Vec2 {
    viewport.center() - frame * (scale * 0.5)
}

impl MobileActor for Hero {
    fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    fn kinematics_mut(&mut self) -> &mut Kinematics {
        &mut self.kinematics
    }

    fn body_rect_at(&self, position: Vec2) -> Rect {
        body_rect_for(position + self.screen_anchor, self.frame, self.scale)
    }

    fn active_attack_rect(&self) -> Option<Rect> {
        self.flags
            .attacking
            .then(|| attack_rect_for(self.body_rect(), self.facing, self.frame))
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn facing(&self) -> Direction {
        self.facing
    }

    fn activity(&self) -> ActivityFlags {
        self.flags
    }

    fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gameplay::actor::Pose;
    use crate::app::gameplay::props::PropKind;

    const DT: f32 = 1.0 / 60.0;

    fn tick(hero: &mut Hero, input: &InputSnapshot, events: &mut SimEventBus) {
        let tuning = SimTuning::default();
        let mut ctx = HeroTickContext {
            dt: DT,
            input,
            viewport: Viewport::default(),
            legal: Rect::new(0.0, 0.0, 2000.0, 2000.0),
            props: &mut [],
            trees: &[],
            enemies: &mut [],
            tuning: &tuning,
            events,
        };
        hero.tick(&mut ctx);
    }

    fn hero() -> Hero {
        Hero::new(
            Vec2::new(100.0, 100.0),
            Viewport::default(),
            &SimTuning::default(),
        )
    }

    #[test]
    fn body_lands_on_requested_origin() {
        let hero = hero();
        assert_eq!(hero.body_rect(), Rect::new(100.0, 100.0, 12.0, 12.0));
        assert_eq!(hero.screen_anchor(), Vec2::new(622.0, 342.0));
    }

    #[test]
    fn viewport_change_keeps_body_in_world_space() {
        let mut hero = hero();
        let mut events = SimEventBus::default();
        let tuning = SimTuning::default();
        let input = InputSnapshot::empty();
        let mut ctx = HeroTickContext {
            dt: DT,
            input: &input,
            viewport: Viewport {
                width: 800,
                height: 600,
            },
            legal: Rect::new(0.0, 0.0, 2000.0, 2000.0),
            props: &mut [],
            trees: &[],
            enemies: &mut [],
            tuning: &tuning,
            events: &mut events,
        };
        hero.tick(&mut ctx);
        assert_eq!(hero.body_rect(), Rect::new(100.0, 100.0, 12.0, 12.0));
    }

    #[test]
    fn sleep_toggles_on_press_and_walking_cancels_it() {
        let mut hero = hero();
        let mut events = SimEventBus::default();
        let press = InputSnapshot::empty().with_action_pressed(InputAction::Sleep, true);
        tick(&mut hero, &press, &mut events);
        assert_eq!(hero.pose(), Pose::Sleep);
        assert_eq!(hero.mood(), Mood::Sleeping);

        let hold = InputSnapshot::empty().with_action_down(InputAction::Sleep, true);
        tick(&mut hero, &hold, &mut events);
        assert_eq!(hero.pose(), Pose::Sleep);

        let walk = InputSnapshot::empty().with_action_down(InputAction::MoveLeft, true);
        tick(&mut hero, &walk, &mut events);
        assert_eq!(hero.pose(), Pose::Walk);
        assert_eq!(hero.facing(), Direction::Left);
    }

    #[test]
    fn running_emits_footsteps_at_run_cadence() {
        let mut hero = hero();
        let mut events = SimEventBus::default();
        let run = InputSnapshot::empty()
            .with_action_down(InputAction::MoveDown, true)
            .with_action_down(InputAction::Run, true);
        for _ in 0..64 {
            tick(&mut hero, &run, &mut events);
        }
        let steps = events
            .iter_emitted_so_far()
            .filter(|event| matches!(event, SimEvent::Footstep { running: true }))
            .count();
        assert_eq!(steps, 4);
        assert_eq!(hero.pose(), Pose::Run);
        assert!((hero.body_rect().y - 260.0).abs() < 1e-3);
    }

    #[test]
    fn walking_into_a_wall_makes_no_footsteps() {
        let mut hero = hero();
        let mut events = SimEventBus::default();
        let tuning = SimTuning::default();
        let mut props = [Prop::new(
            PropId(0),
            PropKind::Wall,
            Vec2::new(112.0, 90.0),
            Vec2::new(20.0, 40.0),
        )];
        let walk = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);
        for _ in 0..120 {
            let mut ctx = HeroTickContext {
                dt: DT,
                input: &walk,
                viewport: Viewport::default(),
                legal: Rect::new(0.0, 0.0, 2000.0, 2000.0),
                props: &mut props,
                trees: &[],
                enemies: &mut [],
                tuning: &tuning,
                events: &mut events,
            };
            hero.tick(&mut ctx);
        }
        assert_eq!(hero.body_rect().x, 100.0);
        assert!(!events
            .iter_emitted_so_far()
            .any(|event| matches!(event, SimEvent::Footstep { .. })));
    }

    #[test]
    fn attack_window_opens_only_while_held() {
        let mut hero = hero();
        let mut events = SimEventBus::default();
        let attack = InputSnapshot::empty().with_action_down(InputAction::Attack, true);
        tick(&mut hero, &attack, &mut events);
        assert_eq!(hero.attack_phase(), AttackPhase::Active);
        assert!(hero.active_attack_rect().is_some());
        assert_eq!(hero.mood(), Mood::Angry);

        tick(&mut hero, &InputSnapshot::empty(), &mut events);
        assert_eq!(hero.attack_phase(), AttackPhase::Idle);
        assert!(hero.active_attack_rect().is_none());
    }

    #[test]
    fn dead_hero_cannot_move_or_attack() {
        let mut hero = hero();
        let mut events = SimEventBus::default();
        hero.vitals_mut().set_health(0.5);
        tick(&mut hero, &InputSnapshot::empty(), &mut events);
        assert!(!hero.is_alive());
        assert_eq!(hero.mood(), Mood::Dead);

        let before = hero.kinematics().position();
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::Attack, true);
        tick(&mut hero, &input, &mut events);
        assert_eq!(hero.kinematics().position(), before);
        assert_eq!(hero.attack_phase(), AttackPhase::Idle);
        assert_eq!(hero.pose(), Pose::Death);
    }
}
