use foxgrove_engine::{Direction, Rect, Vec2};

use super::motion::Kinematics;
use super::vitals::Vitals;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Pose {
    #[default]
    Idle,
    Walk,
    Run,
    Push,
    Attack,
    Hurt,
    Sleep,
    Death,
}

impl Pose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Push => "push",
            Self::Attack => "attack",
            Self::Hurt => "hurt",
            Self::Sleep => "sleep",
            Self::Death => "death",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityFlags {
    pub walking: bool,
    pub running: bool,
    pub pushing: bool,
    pub attacking: bool,
    pub hurting: bool,
    pub sleeping: bool,
    pub dying: bool,
}

impl ActivityFlags {
    /// Pose selector; later checks in the tick override earlier ones.
    pub fn pose(&self) -> Pose {
        if self.dying {
            Pose::Death
        } else if self.hurting {
            Pose::Hurt
        } else if self.attacking {
            Pose::Attack
        } else if self.walking && self.pushing {
            Pose::Push
        } else if self.walking && self.running {
            Pose::Run
        } else if self.walking {
            Pose::Walk
        } else if self.sleeping {
            Pose::Sleep
        } else {
            Pose::Idle
        }
    }
}

/// Shared surface of the hero and enemies. Collision, bounds and combat
/// resolution are written against this trait.
pub trait MobileActor {
    fn kinematics(&self) -> &Kinematics;
    fn kinematics_mut(&mut self) -> &mut Kinematics;
    fn body_rect_at(&self, position: Vec2) -> Rect;
    /// Attack rectangle while an attack is live this tick.
    fn active_attack_rect(&self) -> Option<Rect>;
    fn vitals(&self) -> &Vitals;
    fn facing(&self) -> Direction;
    fn activity(&self) -> ActivityFlags;
    fn is_invulnerable(&self) -> bool;

    fn body_rect(&self) -> Rect {
        self.body_rect_at(self.kinematics().position())
    }

    fn previous_body_rect(&self) -> Rect {
        self.body_rect_at(self.kinematics().previous())
    }

    fn is_dying(&self) -> bool {
        self.activity().dying
    }

    fn pose(&self) -> Pose {
        self.activity().pose()
    }
}

/// Body rectangle for a sprite whose top-left is `origin`: a third of the
/// frame, scaled, inset by half a frame.
pub(crate) fn body_rect_for(origin: Vec2, frame: Vec2, scale: f32) -> Rect {
    Rect::new(
        origin.x + frame.x * 0.5,
        origin.y + frame.y * 0.5,
        (frame.x - frame.x / 1.5) * scale,
        (frame.y - frame.y / 1.5) * scale,
    )
}

/// Body-sized rectangle shifted half a frame toward `facing`.
pub(crate) fn attack_rect_for(body: Rect, facing: Direction, frame: Vec2) -> Rect {
    let unit = facing.unit();
    body.translated(Vec2::new(unit.x * frame.x * 0.5, unit.y * frame.y * 0.5))
}
