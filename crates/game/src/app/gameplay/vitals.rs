use super::tuning::SimTuning;

/// Health below or at this value means the hero is dead.
pub const HERO_DEATH_THRESHOLD: f32 = 1.0;

/// Health kept in `[0, max_health]` across every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    health: f32,
    max_health: f32,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        let max_health = if max_health.is_finite() {
            max_health.max(0.0)
        } else {
            0.0
        };
        Self {
            health: max_health,
            max_health,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_full(&self) -> bool {
        self.health >= self.max_health
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = if health.is_nan() {
            0.0
        } else {
            health.clamp(0.0, self.max_health)
        };
    }

    /// Returns the health actually removed.
    pub fn damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.set_health(before - amount.max(0.0));
        before - self.health
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.set_health(before + amount.max(0.0));
        self.health - before
    }
}

/// Gradual healing toward a total. Re-activating while running extends the
/// remaining total; the nominal increment counts toward the total even when
/// health is capped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HealOverTime {
    remaining: f32,
    elapsed: f32,
}

impl HealOverTime {
    pub fn activate(&mut self, total: f32) {
        if !(total.is_finite() && total > 0.0) {
            return;
        }
        if !self.is_active() {
            self.elapsed = 0.0;
        }
        self.remaining += total;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn tick(&mut self, dt: f32, increment: f32, interval: f32, vitals: &mut Vitals) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        if !(increment.is_finite() && increment > 0.0) {
            self.remaining = 0.0;
            self.elapsed = 0.0;
            return 0.0;
        }
        if !(interval.is_finite() && interval > 0.0) {
            let total = self.remaining;
            self.remaining = 0.0;
            self.elapsed = 0.0;
            return vitals.heal(total);
        }
        self.elapsed += dt;
        let mut healed = 0.0;
        while self.elapsed >= interval && self.is_active() {
            self.elapsed -= interval;
            let step = increment.min(self.remaining);
            self.remaining -= step;
            healed += vitals.heal(step);
        }
        if !self.is_active() {
            self.remaining = 0.0;
            self.elapsed = 0.0;
        }
        healed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepClock {
    elapsed: f32,
}

impl SleepClock {
    pub fn tick(&mut self, dt: f32, sleeping: bool, tuning: &SimTuning, vitals: &mut Vitals) -> f32 {
        if !sleeping {
            self.elapsed = 0.0;
            return 0.0;
        }
        self.elapsed += dt;
        if self.elapsed >= tuning.sleep_heal_interval_seconds && !vitals.is_full() {
            self.elapsed = 0.0;
            return vitals.heal(tuning.sleep_heal_amount);
        }
        0.0
    }
}

/// Heal granted for a defeated enemy, tiered by its maximum health.
pub fn heal_reward_for(enemy_max_health: f32, tuning: &SimTuning) -> f32 {
    if enemy_max_health >= 8.0 {
        tuning.heal_reward_large
    } else if enemy_max_health >= 5.0 {
        tuning.heal_reward_medium
    } else if enemy_max_health > 0.0 {
        tuning.heal_reward_small
    } else {
        0.0
    }
}

pub fn hero_alive(vitals: &Vitals) -> bool {
    vitals.health() > HERO_DEATH_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_is_clamped_on_every_mutation() {
        let mut vitals = Vitals::new(11.0);
        assert!((vitals.heal(5.0)).abs() < f32::EPSILON);
        assert!((vitals.damage(20.0) - 11.0).abs() < f32::EPSILON);
        assert_eq!(vitals.health(), 0.0);
        vitals.set_health(f32::NAN);
        assert_eq!(vitals.health(), 0.0);
        vitals.set_health(-3.0);
        assert_eq!(vitals.health(), 0.0);
    }

    #[test]
    fn heal_over_time_stops_at_total() {
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(2.0);
        let mut heal = HealOverTime::default();
        heal.activate(1.5);
        let mut healed = 0.0;
        for _ in 0..600 {
            healed += heal.tick(1.0 / 60.0, 0.5, 2.0 / 3.0, &mut vitals);
        }
        assert!((healed - 1.5).abs() < 1e-5);
        assert!((vitals.health() - 3.5).abs() < 1e-5);
        assert!(!heal.is_active());
    }

    #[test]
    fn heal_over_time_first_increment_waits_one_interval() {
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(5.0);
        let mut heal = HealOverTime::default();
        heal.activate(4.0);
        assert_eq!(heal.tick(0.5, 0.5, 2.0 / 3.0, &mut vitals), 0.0);
        assert!((heal.tick(0.2, 0.5, 2.0 / 3.0, &mut vitals) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_interval_releases_the_pool_in_one_tick() {
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(5.0);
        let mut heal = HealOverTime::default();
        heal.activate(2.0);
        assert!((heal.tick(1.0 / 60.0, 0.5, 0.0, &mut vitals) - 2.0).abs() < 1e-6);
        assert!(!heal.is_active());
        assert_eq!(heal.tick(1.0 / 60.0, 0.5, -1.0, &mut vitals), 0.0);
    }

    #[test]
    fn zero_increment_drops_the_pool() {
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(5.0);
        let mut heal = HealOverTime::default();
        heal.activate(2.0);
        assert_eq!(heal.tick(1.0, 0.0, 2.0 / 3.0, &mut vitals), 0.0);
        assert!(!heal.is_active());
        assert_eq!(vitals.health(), 5.0);
    }

    #[test]
    fn reactivation_extends_the_remaining_total() {
        let mut heal = HealOverTime::default();
        heal.activate(1.5);
        heal.activate(2.5);
        assert!((heal.remaining() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sleep_heals_only_below_max() {
        let tuning = SimTuning::default();
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(10.0);
        let mut sleep = SleepClock::default();
        assert_eq!(sleep.tick(1.5, true, &tuning, &mut vitals), 0.0);
        assert!((sleep.tick(0.5, true, &tuning, &mut vitals) - 0.5).abs() < 1e-6);

        vitals.set_health(11.0);
        assert_eq!(sleep.tick(2.5, true, &tuning, &mut vitals), 0.0);
    }

    #[test]
    fn reward_tiers_follow_enemy_max_health() {
        let tuning = SimTuning::default();
        assert_eq!(heal_reward_for(8.0, &tuning), 4.0);
        assert_eq!(heal_reward_for(5.0, &tuning), 2.5);
        assert_eq!(heal_reward_for(3.0, &tuning), 1.5);
    }

    #[test]
    fn alive_threshold_is_exclusive() {
        let mut vitals = Vitals::new(11.0);
        vitals.set_health(1.0);
        assert!(!hero_alive(&vitals));
        vitals.set_health(1.01);
        assert!(hero_alive(&vitals));
    }
}
