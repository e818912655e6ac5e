use super::actor::MobileActor;
use super::tuning::SimTuning;
use super::vitals::Vitals;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttackPhase {
    #[default]
    Idle,
    Active,
    Cooldown,
}

/// Attack window driven by one accumulating timer. While the signal is held
/// the window is ACTIVE below `active_seconds`, then COOLDOWN, and resets to
/// zero once `cycle_seconds` is reached. Releasing the signal or being locked
/// drops to IDLE without touching the timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackWindow {
    elapsed: f32,
    active_seconds: f32,
    cycle_seconds: f32,
    phase: AttackPhase,
}

impl AttackWindow {
    pub fn new(active_seconds: f32, cycle_seconds: f32) -> Self {
        Self {
            elapsed: 0.0,
            active_seconds,
            cycle_seconds: cycle_seconds.max(active_seconds),
            phase: AttackPhase::Idle,
        }
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == AttackPhase::Active
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn tick(&mut self, dt: f32, held: bool, locked: bool) -> AttackPhase {
        self.elapsed += dt;
        self.phase = if !held || locked {
            AttackPhase::Idle
        } else if self.elapsed < self.active_seconds {
            AttackPhase::Active
        } else if self.elapsed >= self.cycle_seconds {
            self.elapsed = 0.0;
            AttackPhase::Cooldown
        } else {
            AttackPhase::Cooldown
        };
        self.phase
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContactOutcome {
    pub hurting: bool,
    pub applied: Option<f32>,
}

/// Dual-timer contact damage. The timer advances every tick and only resets
/// when damage fires: contact within the first `hurt_window` seconds shows
/// the hurt state, contact at or after `interval` seconds deals damage, and
/// the gap between the two does neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageClock {
    elapsed: f32,
    hurt_window: f32,
    interval: f32,
    hurting: bool,
}

impl DamageClock {
    pub fn new(hurt_window: f32, interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            hurt_window,
            interval,
            hurting: false,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn hurting(&self) -> bool {
        self.hurting
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed > self.hurt_window {
            self.hurting = false;
        }
    }

    pub fn contact(&mut self, amount: f32, vitals: &mut Vitals) -> ContactOutcome {
        if self.elapsed <= self.hurt_window {
            self.hurting = true;
        }
        let mut applied = None;
        if self.elapsed >= self.interval {
            if vitals.health() > 0.0 {
                applied = Some(vitals.damage(amount));
            }
            self.elapsed = 0.0;
        }
        ContactOutcome {
            hurting: self.hurting,
            applied,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    Body { heavy: bool },
    Attack,
    Projectile,
}

impl ContactSource {
    pub fn damage(self, tuning: &SimTuning) -> f32 {
        match self {
            Self::Body { heavy: false } => tuning.normal_contact_damage,
            Self::Body { heavy: true } | Self::Attack | Self::Projectile => {
                tuning.heavy_contact_damage
            }
        }
    }
}

/// True when the attacker has a live attack overlapping the target's body and
/// the target can currently be hit.
pub fn attack_connects<A, T>(attacker: &A, target: &T) -> bool
where
    A: MobileActor + ?Sized,
    T: MobileActor + ?Sized,
{
    if attacker.is_dying() || target.is_dying() || target.is_invulnerable() {
        return false;
    }
    attacker
        .active_attack_rect()
        .is_some_and(|rect| rect.overlaps(&target.body_rect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn held_attack_cycles_active_cooldown_reset() {
        let mut window = AttackWindow::new(0.4, 0.7);
        let mut phases = Vec::new();
        for _ in 0..90 {
            phases.push(window.tick(DT, true, false));
        }
        let active_ticks = phases.iter().filter(|p| **p == AttackPhase::Active).count();
        assert!(phases[0] == AttackPhase::Active);
        assert!(phases[30] == AttackPhase::Cooldown);
        assert!(active_ticks >= 48, "active ticks {active_ticks}");
    }

    #[test]
    fn releasing_goes_idle_while_timer_keeps_running() {
        let mut window = AttackWindow::new(0.4, 0.7);
        window.tick(0.1, true, false);
        assert_eq!(window.tick(0.1, false, false), AttackPhase::Idle);
        assert!((window.elapsed() - 0.2).abs() < 1e-6);
        assert_eq!(window.tick(0.05, true, true), AttackPhase::Idle);
        assert_eq!(window.tick(0.05, true, false), AttackPhase::Active);
    }

    #[test]
    fn long_release_resets_before_next_active() {
        let mut window = AttackWindow::new(0.4, 0.7);
        window.tick(5.0, false, false);
        assert_eq!(window.tick(DT, true, false), AttackPhase::Cooldown);
        assert_eq!(window.tick(DT, true, false), AttackPhase::Active);
    }

    #[test]
    fn continuous_contact_damages_once_in_three_seconds() {
        let mut clock = DamageClock::new(1.0, 2.0);
        let mut vitals = Vitals::new(11.0);
        let mut decrements = 0;
        for _ in 0..180 {
            clock.advance(DT);
            let outcome = clock.contact(0.5, &mut vitals);
            if outcome.applied.is_some() {
                decrements += 1;
            }
            if outcome.hurting {
                assert!(clock.elapsed() <= 1.0 || outcome.applied.is_some());
            }
        }
        assert_eq!(decrements, 1);
        assert!((vitals.health() - 10.5).abs() < 1e-6);
    }

    #[test]
    fn telegraph_gap_neither_hurts_nor_damages() {
        let mut clock = DamageClock::new(1.0, 2.0);
        let mut vitals = Vitals::new(11.0);
        clock.advance(1.5);
        let outcome = clock.contact(0.5, &mut vitals);
        assert!(!outcome.hurting);
        assert_eq!(outcome.applied, None);
        assert_eq!(vitals.health(), 11.0);
    }

    #[test]
    fn no_damage_at_zero_health_but_timer_resets() {
        let mut clock = DamageClock::new(1.0, 2.0);
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(0.0);
        clock.advance(2.0);
        assert_eq!(clock.contact(0.5, &mut vitals).applied, None);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn contact_amounts() {
        let tuning = SimTuning::default();
        assert_eq!(ContactSource::Body { heavy: false }.damage(&tuning), 0.5);
        assert_eq!(ContactSource::Body { heavy: true }.damage(&tuning), 1.0);
        assert_eq!(ContactSource::Projectile.damage(&tuning), 1.0);
    }
}
