use foxgrove_engine::{Direction, EnemyDef, Rect, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::actor::{attack_rect_for, body_rect_for, ActivityFlags, MobileActor};
use super::bounds::clamp_to_bounds;
use super::collision::{resolve_static, StaticContext};
use super::combat::{AttackWindow, ContactSource};
use super::events::{SimEvent, SimEventBus};
use super::motion::{step, CorrectionReason, Kinematics};
use super::progress::WorldProgress;
use super::props::{Prop, Tree};
use super::tuning::SimTuning;
use super::vitals::Vitals;

pub const DEFAULT_ENEMY_MAX_HEALTH: f32 = 3.0;
pub const DEFAULT_ENEMY_SPEED: f32 = 1.4;
pub const DEFAULT_AGGRO_RADIUS: f32 = 150.0;
pub const DEFAULT_ATTACK_RANGE: f32 = 60.0;
pub const DEFAULT_ENEMY_SCALE: f32 = 3.2;
pub const DEFAULT_ENEMY_FRAME: Vec2 = Vec2::new(16.0, 16.0);
const WANDER_ARRIVAL_THRESHOLD: f32 = 0.5;
/// Shortest seeded wander leg, as a fraction of `wander_offset`.
const MIN_WANDER_REACH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Race {
    Bear,
    Beholder,
    Creature,
    Ghost,
    Imp,
    Mushroom,
    Necromancer,
    Shadow,
    Spider,
    Toad,
    Fox,
    Crow,
    Squirrel,
}

impl Race {
    pub const ALL: [Race; 13] = [
        Race::Bear,
        Race::Beholder,
        Race::Creature,
        Race::Ghost,
        Race::Imp,
        Race::Mushroom,
        Race::Necromancer,
        Race::Shadow,
        Race::Spider,
        Race::Toad,
        Race::Fox,
        Race::Crow,
        Race::Squirrel,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|race| race.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bear => "bear",
            Self::Beholder => "beholder",
            Self::Creature => "creature",
            Self::Ghost => "ghost",
            Self::Imp => "imp",
            Self::Mushroom => "mushroom",
            Self::Necromancer => "necromancer",
            Self::Shadow => "shadow",
            Self::Spider => "spider",
            Self::Toad => "toad",
            Self::Fox => "fox",
            Self::Crow => "crow",
            Self::Squirrel => "squirrel",
        }
    }

    pub fn ranged_by_default(self) -> bool {
        matches!(self, Self::Beholder | Self::Necromancer | Self::Imp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyTier {
    Normal,
    Boss,
    /// Ambient creatures; never fight the hero.
    Wildlife,
}

impl EnemyTier {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "boss" => Some(Self::Boss),
            "wildlife" | "npc" => Some(Self::Wildlife),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Boss => "boss",
            Self::Wildlife => "wildlife",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Idle,
    Wander,
    Chase,
    Attack,
    Blocked,
    Dying,
    Dormant,
}

impl AiState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Wander => "wander",
            Self::Chase => "chase",
            Self::Attack => "attack",
            Self::Blocked => "blocked",
            Self::Dying => "dying",
            Self::Dormant => "dormant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    center: Vec2,
    direction: Vec2,
    travelled: f32,
    size: f32,
}

impl Projectile {
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    pub fn rect(&self) -> Rect {
        let half = self.size * 0.5;
        Rect::new(self.center.x - half, self.center.y - half, self.size, self.size)
    }

    fn advance(&mut self, speed: f32) {
        self.center += self.direction * speed;
        self.travelled += speed;
    }
}

/// Snapshot of the hero taken before enemies tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HeroView {
    pub body: Rect,
    pub alive: bool,
}

pub(crate) struct EnemyTickContext<'a> {
    pub dt: f32,
    pub hero: HeroView,
    pub others_before: &'a [Enemy],
    pub others_after: &'a [Enemy],
    pub props: &'a mut [Prop],
    pub trees: &'a [Tree],
    pub legal: Rect,
    pub progress: &'a mut WorldProgress,
    pub events: &'a mut SimEventBus,
    pub tuning: &'a SimTuning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    race: Race,
    tier: EnemyTier,
    kinematics: Kinematics,
    home: Vec2,
    frame: Vec2,
    scale: f32,
    vitals: Vitals,
    speed: f32,
    aggro_radius: f32,
    attack_range: f32,
    ranged: bool,
    facing: Direction,
    flags: ActivityFlags,
    ai: AiState,
    attack: AttackWindow,
    invulnerable_timer: f32,
    death_timer: f32,
    death_counted: bool,
    reward_claimed: bool,
    removed: bool,
    summoned: bool,
    consecutive_reverts: u32,
    blocked_timer: f32,
    wander_sign: f32,
    wander_reach: f32,
    wander_rng: Option<ChaCha8Rng>,
    idle_timer: f32,
    projectile: Option<Projectile>,
}

impl Enemy {
    /// `position` is the sprite's top-left corner in world units and becomes
    /// the enemy's wander home.
    pub fn new(id: EnemyId, race: Race, tier: EnemyTier, position: Vec2, tuning: &SimTuning) -> Self {
        let summoned = tier != EnemyTier::Boss;
        let wander_rng = tuning
            .wander_seed
            .map(|seed| ChaCha8Rng::seed_from_u64(seed ^ u64::from(id.0)));
        let mut enemy = Self {
            id,
            race,
            tier,
            kinematics: Kinematics::new(position),
            home: position,
            frame: DEFAULT_ENEMY_FRAME,
            scale: DEFAULT_ENEMY_SCALE,
            vitals: Vitals::new(DEFAULT_ENEMY_MAX_HEALTH),
            speed: DEFAULT_ENEMY_SPEED,
            aggro_radius: DEFAULT_AGGRO_RADIUS,
            attack_range: DEFAULT_ATTACK_RANGE,
            ranged: race.ranged_by_default(),
            facing: Direction::Down,
            flags: ActivityFlags::default(),
            ai: if summoned { AiState::Idle } else { AiState::Dormant },
            attack: AttackWindow::new(
                tuning.enemy_attack_active_seconds,
                tuning.enemy_attack_cycle_seconds,
            ),
            invulnerable_timer: 0.0,
            death_timer: 0.0,
            death_counted: false,
            reward_claimed: false,
            removed: false,
            summoned,
            consecutive_reverts: 0,
            blocked_timer: 0.0,
            wander_sign: if id.0 % 2 == 0 { 1.0 } else { -1.0 },
            wander_reach: 1.0,
            wander_rng,
            idle_timer: 0.0,
            projectile: None,
        };
        if enemy.wander_rng.is_some() {
            enemy.next_wander_leg();
        }
        enemy
    }

    pub fn from_def(
        id: EnemyId,
        def: &EnemyDef,
        race: Race,
        tier: EnemyTier,
        position: Vec2,
        tuning: &SimTuning,
    ) -> Self {
        let mut enemy = Self::new(id, race, tier, position, tuning)
            .with_max_health(def.max_health)
            .with_speed(def.speed)
            .with_ranges(def.aggro_radius, def.attack_range)
            .with_sprite(def.frame_size, def.scale);
        if let Some(ranged) = def.ranged {
            enemy = enemy.with_ranged(ranged);
        }
        enemy
    }

    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.vitals = Vitals::new(max_health);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    pub fn with_ranges(mut self, aggro_radius: f32, attack_range: f32) -> Self {
        self.aggro_radius = aggro_radius.max(0.0);
        self.attack_range = attack_range.max(0.0);
        self
    }

    pub fn with_ranged(mut self, ranged: bool) -> Self {
        self.ranged = ranged;
        self
    }

    pub fn with_sprite(mut self, frame: Vec2, scale: f32) -> Self {
        self.frame = frame;
        self.scale = scale;
        self
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn race(&self) -> Race {
        self.race
    }

    pub fn tier(&self) -> EnemyTier {
        self.tier
    }

    pub fn ai_state(&self) -> AiState {
        self.ai
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn is_ranged(&self) -> bool {
        self.ranged
    }

    pub fn is_summoned(&self) -> bool {
        self.summoned
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    /// Summoned and not yet removed; absent enemies have no body.
    pub fn is_present(&self) -> bool {
        self.summoned && !self.removed
    }

    pub fn participates_in_combat(&self) -> bool {
        self.is_present() && self.tier != EnemyTier::Wildlife
    }

    pub fn contact_source(&self) -> ContactSource {
        ContactSource::Body {
            heavy: self.tier == EnemyTier::Boss,
        }
    }

    pub fn attack_source(&self) -> ContactSource {
        if self.projectile.is_some() {
            ContactSource::Projectile
        } else {
            ContactSource::Attack
        }
    }

    /// Applies one hero hit. Returns false when the enemy cannot be hit right
    /// now.
    pub(crate) fn receive_hit(&mut self, tuning: &SimTuning) -> bool {
        if !self.participates_in_combat() || self.flags.dying || self.is_invulnerable() {
            return false;
        }
        self.vitals.damage(tuning.hero_hit_damage);
        self.invulnerable_timer = tuning.enemy_invulnerable_seconds;
        self.flags.hurting = true;
        true
    }

    /// True exactly once, on the first call after the enemy died.
    pub(crate) fn claim_heal_reward(&mut self) -> bool {
        if !self.flags.dying || self.vitals.health() > 0.0 || self.reward_claimed {
            return false;
        }
        self.reward_claimed = true;
        true
    }

    pub(crate) fn clear_projectile(&mut self) {
        self.projectile = None;
    }

    pub(crate) fn tick(&mut self, ctx: &mut EnemyTickContext<'_>) {
        self.kinematics.begin_tick();
        self.flags = ActivityFlags {
            dying: self.flags.dying,
            ..ActivityFlags::default()
        };
        if self.removed {
            return;
        }
        if self.ai == AiState::Dormant {
            if !ctx.progress.all_normals_defeated(self.race) {
                return;
            }
            self.summoned = true;
            self.ai = AiState::Idle;
            ctx.events.emit(SimEvent::BossSummoned {
                enemy: self.id,
                race: self.race,
            });
            info!(enemy = self.id.0, race = self.race.as_str(), "boss_summoned");
        }

        self.invulnerable_timer = (self.invulnerable_timer - ctx.dt).max(0.0);
        self.flags.hurting = self.invulnerable_timer > 0.0;

        if self.vitals.health() <= 0.0 && !self.flags.dying {
            self.begin_dying(ctx);
        }
        if self.flags.dying {
            self.death_timer += ctx.dt;
            if self.death_timer >= ctx.tuning.enemy_death_seconds {
                self.removed = true;
                debug!(enemy = self.id.0, "enemy_removed");
            }
            return;
        }

        let direction = self.decide(ctx);
        let moved = step(&mut self.kinematics, direction, self.speed, false);
        if moved {
            self.resolve_motion(ctx);
        }
        self.track_blocked(moved, ctx.tuning);
        if let Some(facing) = Direction::from_dominant_axis(self.kinematics.delta()) {
            self.facing = facing;
        }
        self.flags.walking = self.kinematics.delta() != Vec2::ZERO;
        self.advance_projectile(ctx.tuning);
    }

    fn begin_dying(&mut self, ctx: &mut EnemyTickContext<'_>) {
        self.flags.dying = true;
        self.ai = AiState::Dying;
        self.death_timer = 0.0;
        self.projectile = None;
        if self.death_counted {
            return;
        }
        self.death_counted = true;
        ctx.progress.record_kill(self.race, self.tier);
        ctx.events.emit(SimEvent::EnemyDefeated {
            enemy: self.id,
            race: self.race,
        });
        info!(
            enemy = self.id.0,
            race = self.race.as_str(),
            tier = self.tier.as_str(),
            kills = ctx.progress.kills(self.race),
            "enemy_defeated"
        );
    }

    /// Picks this tick's AI state and returns the desired movement direction.
    fn decide(&mut self, ctx: &mut EnemyTickContext<'_>) -> Vec2 {
        if self.ai == AiState::Blocked {
            self.blocked_timer -= ctx.dt;
            if self.blocked_timer > 0.0 {
                self.attack.tick(ctx.dt, false, false);
                return Vec2::ZERO;
            }
            self.wander_sign = -self.wander_sign;
            self.idle_timer = 0.0;
            self.ai = AiState::Wander;
        }

        if self.tier != EnemyTier::Wildlife && ctx.hero.alive {
            let to_hero = ctx.hero.body.center() - self.body_rect().center();
            let distance = to_hero.length();
            let engage_range = if self.ranged {
                self.attack_range.max(ctx.tuning.ranged_attack_range)
            } else {
                self.attack_range
            };
            if distance <= engage_range {
                return self.attack_hero(to_hero, ctx);
            }
            self.attack.tick(ctx.dt, false, false);
            if distance <= self.aggro_radius {
                self.ai = AiState::Chase;
                return to_hero;
            }
        } else {
            self.attack.tick(ctx.dt, false, false);
        }
        self.wander(ctx.dt, ctx.tuning)
    }

    fn attack_hero(&mut self, to_hero: Vec2, ctx: &mut EnemyTickContext<'_>) -> Vec2 {
        self.ai = AiState::Attack;
        if let Some(facing) = Direction::from_dominant_axis(to_hero) {
            self.facing = facing;
        }
        let was_active = self.attack.is_active();
        self.attack.tick(ctx.dt, true, false);
        self.flags.attacking = self.attack.is_active();
        if self.flags.attacking && !was_active && self.ranged && self.projectile.is_none() {
            self.launch_projectile(to_hero, ctx.tuning);
        }
        // Melee enemies close in until their body touches the hero.
        if self.ranged || self.body_rect().overlaps(&ctx.hero.body) {
            Vec2::ZERO
        } else {
            to_hero
        }
    }

    fn wander(&mut self, dt: f32, tuning: &SimTuning) -> Vec2 {
        if self.idle_timer > 0.0 {
            self.idle_timer = (self.idle_timer - dt).max(0.0);
            self.ai = AiState::Idle;
            self.flags.sleeping = self.tier == EnemyTier::Wildlife;
            return Vec2::ZERO;
        }
        let target = Vec2::new(
            self.home.x + self.wander_sign * tuning.wander_offset * self.wander_reach,
            self.home.y,
        );
        let to_target = target - self.kinematics.position();
        if to_target.length() <= self.speed.max(WANDER_ARRIVAL_THRESHOLD) {
            self.next_wander_leg();
            self.idle_timer = tuning.wander_idle_seconds;
            self.ai = AiState::Idle;
            return Vec2::ZERO;
        }
        self.ai = AiState::Wander;
        to_target
    }

    /// Seeded enemies draw the next leg's side and reach from their own
    /// stream; the rest alternate sides at full reach.
    fn next_wander_leg(&mut self) {
        match self.wander_rng.as_mut() {
            Some(rng) => {
                self.wander_sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                self.wander_reach = rng.gen_range(MIN_WANDER_REACH..=1.0);
            }
            None => self.wander_sign = -self.wander_sign,
        }
    }

    fn resolve_motion(&mut self, ctx: &mut EnemyTickContext<'_>) {
        clamp_to_bounds(self, &ctx.legal);
        let statics = StaticContext {
            legal: ctx.legal,
            motion: self.kinematics.delta(),
            can_push: false,
            trees: ctx.trees,
        };
        resolve_static(self, &statics, ctx.props);

        let body = self.body_rect();
        let previous = self.previous_body_rect();
        let bumped = ctx
            .others_before
            .iter()
            .chain(ctx.others_after.iter())
            .filter(|other| other.is_present())
            .any(|other| {
                let rect = other.body_rect();
                rect.overlaps(&body) && !rect.overlaps(&previous)
            });
        if bumped {
            self.kinematics.revert(CorrectionReason::ActorOverlap);
        }
    }

    fn track_blocked(&mut self, moved: bool, tuning: &SimTuning) {
        if !(moved && self.kinematics.was_reverted()) {
            self.consecutive_reverts = 0;
            return;
        }
        self.consecutive_reverts = self.consecutive_reverts.saturating_add(1);
        if self.consecutive_reverts >= tuning.blocked_revert_ticks {
            self.consecutive_reverts = 0;
            self.ai = AiState::Blocked;
            self.blocked_timer = tuning.blocked_stop_seconds;
            debug!(
                enemy = self.id.0,
                reason = ?self.kinematics.correction(),
                "enemy_blocked"
            );
        }
    }

    fn launch_projectile(&mut self, to_hero: Vec2, tuning: &SimTuning) {
        let direction = to_hero
            .try_normalize()
            .unwrap_or_else(|| self.facing.unit());
        self.projectile = Some(Projectile {
            center: self.body_rect().center(),
            direction,
            travelled: 0.0,
            size: tuning.projectile_size,
        });
    }

    fn advance_projectile(&mut self, tuning: &SimTuning) {
        let mut expired = false;
        if let Some(projectile) = self.projectile.as_mut() {
            projectile.advance(tuning.projectile_speed);
            expired = projectile.travelled >= tuning.projectile_range;
        }
        if expired {
            self.projectile = None;
        }
    }
}

impl MobileActor for Enemy {
    fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    fn kinematics_mut(&mut self) -> &mut Kinematics {
        &mut self.kinematics
    }

    fn body_rect_at(&self, position: Vec2) -> Rect {
        body_rect_for(position, self.frame, self.scale)
    }

    fn active_attack_rect(&self) -> Option<Rect> {
        if let Some(projectile) = &self.projectile {
            return Some(projectile.rect());
        }
        if self.flags.attacking && !self.ranged {
            return Some(attack_rect_for(self.body_rect(), self.facing, self.frame));
        }
        None
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
        self.invulnerable_timer > 0.0
    }
}
