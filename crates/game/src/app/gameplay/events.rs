use foxgrove_engine::AreaDefId;

use super::enemy::{EnemyId, Race};
use super::props::PropId;
use super::triggers::TriggerId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    AttackConnected { enemy: EnemyId },
    DamageTaken { amount: f32, health: f32 },
    PushPerformed { prop: PropId },
    Footstep { running: bool },
    EnemyDefeated { enemy: EnemyId, race: Race },
    HealRewardGranted { amount: f32 },
    InteractionStarted { prop: PropId },
    InteractionFinished { prop: PropId },
    BossSummoned { enemy: EnemyId, race: Race },
    TriggerFired { zone: TriggerId },
    HeroDied,
    AreaChanged { area: AreaDefId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEventKind {
    AttackConnected,
    DamageTaken,
    PushPerformed,
    Footstep,
    EnemyDefeated,
    HealRewardGranted,
    InteractionStarted,
    InteractionFinished,
    BossSummoned,
    TriggerFired,
    HeroDied,
    AreaChanged,
}

impl SimEvent {
    pub fn kind(self) -> SimEventKind {
        match self {
            Self::AttackConnected { .. } => SimEventKind::AttackConnected,
            Self::DamageTaken { .. } => SimEventKind::DamageTaken,
            Self::PushPerformed { .. } => SimEventKind::PushPerformed,
            Self::Footstep { .. } => SimEventKind::Footstep,
            Self::EnemyDefeated { .. } => SimEventKind::EnemyDefeated,
            Self::HealRewardGranted { .. } => SimEventKind::HealRewardGranted,
            Self::InteractionStarted { .. } => SimEventKind::InteractionStarted,
            Self::InteractionFinished { .. } => SimEventKind::InteractionFinished,
            Self::BossSummoned { .. } => SimEventKind::BossSummoned,
            Self::TriggerFired { .. } => SimEventKind::TriggerFired,
            Self::HeroDied => SimEventKind::HeroDied,
            Self::AreaChanged { .. } => SimEventKind::AreaChanged,
        }
    }
}

impl SimEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttackConnected => "attack_connected",
            Self::DamageTaken => "damage_taken",
            Self::PushPerformed => "push_performed",
            Self::Footstep => "footstep",
            Self::EnemyDefeated => "enemy_defeated",
            Self::HealRewardGranted => "heal_reward_granted",
            Self::InteractionStarted => "interaction_started",
            Self::InteractionFinished => "interaction_finished",
            Self::BossSummoned => "boss_summoned",
            Self::TriggerFired => "trigger_fired",
            Self::HeroDied => "hero_died",
            Self::AreaChanged => "area_changed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimEventCounts {
    pub total: u32,
    pub attack_connected: u32,
    pub damage_taken: u32,
    pub push_performed: u32,
    pub footstep: u32,
    pub enemy_defeated: u32,
    pub heal_reward_granted: u32,
    pub interaction_started: u32,
    pub interaction_finished: u32,
    pub boss_summoned: u32,
    pub trigger_fired: u32,
    pub hero_died: u32,
    pub area_changed: u32,
}

impl SimEventCounts {
    fn record(&mut self, kind: SimEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            SimEventKind::AttackConnected => {
                self.attack_connected = self.attack_connected.saturating_add(1)
            }
            SimEventKind::DamageTaken => self.damage_taken = self.damage_taken.saturating_add(1),
            SimEventKind::PushPerformed => {
                self.push_performed = self.push_performed.saturating_add(1)
            }
            SimEventKind::Footstep => self.footstep = self.footstep.saturating_add(1),
            SimEventKind::EnemyDefeated => {
                self.enemy_defeated = self.enemy_defeated.saturating_add(1)
            }
            SimEventKind::HealRewardGranted => {
                self.heal_reward_granted = self.heal_reward_granted.saturating_add(1)
            }
            SimEventKind::InteractionStarted => {
                self.interaction_started = self.interaction_started.saturating_add(1)
            }
            SimEventKind::InteractionFinished => {
                self.interaction_finished = self.interaction_finished.saturating_add(1)
            }
            SimEventKind::BossSummoned => {
                self.boss_summoned = self.boss_summoned.saturating_add(1)
            }
            SimEventKind::TriggerFired => self.trigger_fired = self.trigger_fired.saturating_add(1),
            SimEventKind::HeroDied => self.hero_died = self.hero_died.saturating_add(1),
            SimEventKind::AreaChanged => self.area_changed = self.area_changed.saturating_add(1),
        }
    }
}

/// Events emitted during the current tick. At rollover they move to the
/// last-tick slot where audio and HUD collaborators read them.
#[derive(Debug, Default)]
pub struct SimEventBus {
    current_tick_events: Vec<SimEvent>,
    last_tick_events: Vec<SimEvent>,
    last_tick_counts: SimEventCounts,
}

impl SimEventBus {
    pub fn emit(&mut self, event: SimEvent) {
        self.current_tick_events.push(event);
    }

    pub fn iter_emitted_so_far(&self) -> impl Iterator<Item = &SimEvent> {
        self.current_tick_events.iter()
    }

    pub fn finish_tick_rollover(&mut self) {
        let mut counts = SimEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.last_tick_events = std::mem::take(&mut self.current_tick_events);
    }

    pub fn last_tick_events(&self) -> &[SimEvent] {
        &self.last_tick_events
    }

    pub fn last_tick_counts(&self) -> SimEventCounts {
        self.last_tick_counts
    }
}
