use foxgrove_engine::Vec2;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("parse tuning json: {message}")]
    Parse { message: String },
    #[error("parse tuning json at {path}: {message}")]
    ParseAt { path: String, message: String },
    #[error("invalid tuning value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every numeric constant the simulation reads. Units are world units per
/// tick for speeds and seconds for timers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimTuning {
    pub hero_max_health: f32,
    pub hero_scale: f32,
    pub hero_frame_size: Vec2,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub push_walk_speed: f32,
    pub push_run_speed: f32,

    pub attack_active_seconds: f32,
    pub attack_cycle_seconds: f32,
    pub enemy_attack_active_seconds: f32,
    pub enemy_attack_cycle_seconds: f32,

    pub hurt_window_seconds: f32,
    pub damage_interval_seconds: f32,
    pub normal_contact_damage: f32,
    pub heavy_contact_damage: f32,
    pub hero_hit_damage: f32,
    pub enemy_invulnerable_seconds: f32,

    pub sleep_heal_amount: f32,
    pub sleep_heal_interval_seconds: f32,
    pub heal_increment: f32,
    pub heal_interval_seconds: f32,
    pub heal_reward_large: f32,
    pub heal_reward_medium: f32,
    pub heal_reward_small: f32,

    pub enemy_death_seconds: f32,
    pub blocked_revert_ticks: u32,
    pub blocked_stop_seconds: f32,
    pub wander_offset: f32,
    pub wander_idle_seconds: f32,
    /// Seeds each enemy's wander stream. `None` alternates sides by id parity.
    pub wander_seed: Option<u64>,
    pub ranged_attack_range: f32,
    pub projectile_speed: f32,
    pub projectile_range: f32,
    pub projectile_size: f32,

    pub interaction_seconds: f32,
    pub footstep_walk_seconds: f32,
    pub footstep_run_seconds: f32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            hero_max_health: 11.0,
            hero_scale: 1.5,
            hero_frame_size: Vec2::new(24.0, 24.0),
            walk_speed: 1.5,
            run_speed: 2.5,
            push_walk_speed: 0.4,
            push_run_speed: 0.9,

            attack_active_seconds: 0.4,
            attack_cycle_seconds: 0.7,
            enemy_attack_active_seconds: 0.5,
            enemy_attack_cycle_seconds: 1.5,

            hurt_window_seconds: 1.0,
            damage_interval_seconds: 2.0,
            normal_contact_damage: 0.5,
            heavy_contact_damage: 1.0,
            hero_hit_damage: 1.0,
            enemy_invulnerable_seconds: 0.5,

            sleep_heal_amount: 0.5,
            sleep_heal_interval_seconds: 2.0,
            heal_increment: 0.5,
            heal_interval_seconds: 2.0 / 3.0,
            heal_reward_large: 4.0,
            heal_reward_medium: 2.5,
            heal_reward_small: 1.5,

            enemy_death_seconds: 1.2,
            blocked_revert_ticks: 3,
            blocked_stop_seconds: 0.75,
            wander_offset: 48.0,
            wander_idle_seconds: 1.5,
            wander_seed: None,
            ranged_attack_range: 120.0,
            projectile_speed: 3.0,
            projectile_range: 220.0,
            projectile_size: 12.0,

            interaction_seconds: 0.6,
            footstep_walk_seconds: 0.35,
            footstep_run_seconds: 0.25,
        }
    }
}

impl SimTuning {
    pub fn from_json_str(raw: &str) -> Result<Self, TuningError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let tuning = match serde_path_to_error::deserialize::<_, SimTuning>(&mut deserializer) {
            Ok(tuning) => tuning,
            Err(error) => {
                let path = error.path().to_string();
                let message = error.into_inner().to_string();
                return Err(if path.is_empty() || path == "." {
                    TuningError::Parse { message }
                } else {
                    TuningError::ParseAt { path, message }
                });
            }
        };
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("hero_max_health", self.hero_max_health),
            ("hero_scale", self.hero_scale),
            ("attack_cycle_seconds", self.attack_cycle_seconds),
            ("enemy_attack_cycle_seconds", self.enemy_attack_cycle_seconds),
            ("damage_interval_seconds", self.damage_interval_seconds),
            ("sleep_heal_interval_seconds", self.sleep_heal_interval_seconds),
            ("heal_interval_seconds", self.heal_interval_seconds),
            ("heal_increment", self.heal_increment),
            ("footstep_walk_seconds", self.footstep_walk_seconds),
            ("footstep_run_seconds", self.footstep_run_seconds),
            ("interaction_seconds", self.interaction_seconds),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("must be finite and > 0, got {value}"),
                });
            }
        }
        if self.attack_active_seconds > self.attack_cycle_seconds {
            return Err(TuningError::Invalid {
                field: "attack_active_seconds",
                reason: "must not exceed attack_cycle_seconds".to_string(),
            });
        }
        if self.enemy_attack_active_seconds > self.enemy_attack_cycle_seconds {
            return Err(TuningError::Invalid {
                field: "enemy_attack_active_seconds",
                reason: "must not exceed enemy_attack_cycle_seconds".to_string(),
            });
        }
        if self.hurt_window_seconds > self.damage_interval_seconds {
            return Err(TuningError::Invalid {
                field: "hurt_window_seconds",
                reason: "must not exceed damage_interval_seconds".to_string(),
            });
        }
        if self.blocked_revert_ticks == 0 {
            return Err(TuningError::Invalid {
                field: "blocked_revert_ticks",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn hero_speed(&self, running: bool, pushing: bool) -> f32 {
        match (running, pushing) {
            (true, true) => self.push_run_speed,
            (true, false) => self.run_speed,
            (false, true) => self.push_walk_speed,
            (false, false) => self.walk_speed,
        }
    }

    pub(crate) fn footstep_cadence(&self, running: bool) -> f32 {
        if running {
            self.footstep_run_seconds
        } else {
            self.footstep_walk_seconds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = SimTuning::from_json_str(r#"{ "walk_speed": 2.0 }"#).expect("tuning");
        assert!((tuning.walk_speed - 2.0).abs() < f32::EPSILON);
        assert!((tuning.run_speed - 2.5).abs() < f32::EPSILON);
        assert_eq!(tuning.blocked_revert_ticks, 3);
    }

    #[test]
    fn wander_seed_is_optional() {
        assert_eq!(SimTuning::default().wander_seed, None);
        let tuning = SimTuning::from_json_str(r#"{ "wander_seed": 1234 }"#).expect("tuning");
        assert_eq!(tuning.wander_seed, Some(1234));
    }

    #[test]
    fn type_errors_report_the_field_path() {
        let err = SimTuning::from_json_str(r#"{ "hero_frame_size": { "x": "wide", "y": 1 } }"#)
            .expect_err("err");
        match err {
            TuningError::ParseAt { path, .. } => assert_eq!(path, "hero_frame_size.x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(SimTuning::from_json_str(r#"{ "walk_sped": 2.0 }"#).is_err());
    }

    #[test]
    fn active_longer_than_cycle_is_invalid() {
        let err = SimTuning::from_json_str(r#"{ "attack_active_seconds": 0.9 }"#).expect_err("err");
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "attack_active_seconds",
                ..
            }
        ));
    }

    #[test]
    fn gait_speeds_follow_push_state() {
        let tuning = SimTuning::default();
        assert!((tuning.hero_speed(false, false) - 1.5).abs() < f32::EPSILON);
        assert!((tuning.hero_speed(true, false) - 2.5).abs() < f32::EPSILON);
        assert!((tuning.hero_speed(false, true) - 0.4).abs() < f32::EPSILON);
        assert!((tuning.hero_speed(true, true) - 0.9).abs() < f32::EPSILON);
    }
}
