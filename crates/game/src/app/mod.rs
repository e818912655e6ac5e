pub(crate) mod bootstrap;
pub mod gameplay;
pub(crate) mod loop_runner;

pub use bootstrap::{build_app, AppWiring, BootstrapError};
pub use loop_runner::run;
