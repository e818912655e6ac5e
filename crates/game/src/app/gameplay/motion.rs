use foxgrove_engine::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionReason {
    OutOfBounds,
    Blocked,
    PushFailed,
    ActorOverlap,
}

/// Position state of a mobile actor. `previous` is the tick-start position;
/// every revert lands exactly there, and only the first reason of a tick is
/// kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    position: Vec2,
    previous: Vec2,
    correction: Option<CorrectionReason>,
}

impl Kinematics {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            previous: position,
            correction: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    pub fn correction(&self) -> Option<CorrectionReason> {
        self.correction
    }

    pub fn was_reverted(&self) -> bool {
        self.correction.is_some()
    }

    /// Displacement applied so far this tick.
    pub fn delta(&self) -> Vec2 {
        self.position - self.previous
    }

    pub(crate) fn begin_tick(&mut self) {
        self.previous = self.position;
        self.correction = None;
    }

    pub(crate) fn revert(&mut self, reason: CorrectionReason) {
        self.position = self.previous;
        if self.correction.is_none() {
            self.correction = Some(reason);
        }
    }

    pub(crate) fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.previous = position;
        self.correction = None;
    }
}

/// Direction vector from per-axis intent; opposing keys cancel.
pub fn intent_direction(axis: (i8, i8)) -> Vec2 {
    Vec2::new(f32::from(axis.0), f32::from(axis.1))
}

/// Starts the actor's tick and integrates one step of motion. The direction is
/// normalized so diagonal movement is no faster than axis movement. Returns
/// whether the actor moved.
pub fn step(kinematics: &mut Kinematics, direction: Vec2, speed: f32, locked: bool) -> bool {
    kinematics.begin_tick();
    if locked || speed.is_nan() || speed <= 0.0 {
        return false;
    }
    let Some(unit) = direction.try_normalize() else {
        return false;
    };
    kinematics.position += unit * speed;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_step_is_no_faster_than_axis_step() {
        let mut kinematics = Kinematics::new(Vec2::ZERO);
        assert!(step(&mut kinematics, intent_direction((1, 1)), 1.5, false));
        assert!((kinematics.delta().length() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn zero_direction_and_lock_do_not_move_but_still_record_previous() {
        let mut kinematics = Kinematics::new(Vec2::new(4.0, 4.0));
        step(&mut kinematics, Vec2::new(1.0, 0.0), 2.0, false);
        assert_eq!(kinematics.position(), Vec2::new(6.0, 4.0));

        assert!(!step(&mut kinematics, Vec2::ZERO, 2.0, false));
        assert_eq!(kinematics.previous(), Vec2::new(6.0, 4.0));

        assert!(!step(&mut kinematics, Vec2::new(1.0, 0.0), 2.0, true));
        assert_eq!(kinematics.position(), Vec2::new(6.0, 4.0));
    }

    #[test]
    fn revert_is_idempotent_and_keeps_first_reason() {
        let mut kinematics = Kinematics::new(Vec2::ZERO);
        step(&mut kinematics, Vec2::new(0.0, 1.0), 1.0, false);
        kinematics.revert(CorrectionReason::OutOfBounds);
        kinematics.revert(CorrectionReason::Blocked);
        assert_eq!(kinematics.position(), Vec2::ZERO);
        assert_eq!(kinematics.correction(), Some(CorrectionReason::OutOfBounds));
    }
}
