use foxgrove_engine::Rect;

use super::actor::MobileActor;
use super::motion::CorrectionReason;

/// Reverts the actor to its tick-start position when its body leaves `legal`.
/// Returns whether a revert happened.
pub fn clamp_to_bounds<A: MobileActor>(actor: &mut A, legal: &Rect) -> bool {
    if legal.contains_rect(&actor.body_rect()) {
        return false;
    }
    actor
        .kinematics_mut()
        .revert(CorrectionReason::OutOfBounds);
    true
}

#[cfg(test)]
mod tests {
    use foxgrove_engine::Vec2;

    use super::*;
    use crate::app::gameplay::enemy::{Enemy, EnemyId, EnemyTier, Race};
    use crate::app::gameplay::motion::step;
    use crate::app::gameplay::tuning::SimTuning;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(
            EnemyId(0),
            Race::Toad,
            EnemyTier::Normal,
            Vec2::new(x, y),
            &SimTuning::default(),
        )
    }

    #[test]
    fn leaving_legal_rect_reverts_to_tick_start() {
        let legal = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut enemy = enemy_at(70.0, 40.0);
        step(enemy.kinematics_mut(), Vec2::new(1.0, 0.0), 10.0, false);
        assert!(clamp_to_bounds(&mut enemy, &legal));
        assert_eq!(enemy.kinematics().position(), Vec2::new(70.0, 40.0));
        assert_eq!(
            enemy.kinematics().correction(),
            Some(CorrectionReason::OutOfBounds)
        );
    }

    #[test]
    fn motion_inside_legal_rect_is_kept() {
        let legal = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut enemy = enemy_at(20.0, 20.0);
        step(enemy.kinematics_mut(), Vec2::new(0.0, 1.0), 5.0, false);
        assert!(!clamp_to_bounds(&mut enemy, &legal));
        assert_eq!(enemy.kinematics().position(), Vec2::new(20.0, 25.0));
    }
}
