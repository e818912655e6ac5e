pub mod app;

pub use app::gameplay::{HudSnapshot, SimTuning, World};
