mod clock;
mod geometry;
mod input;

pub use clock::{LoopConfig, StepClock, StepPlan};
pub use geometry::{Direction, Rect, Vec2, Viewport};
pub use input::{InputAction, InputSnapshot};
