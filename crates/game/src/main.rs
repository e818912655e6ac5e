use std::process::ExitCode;

use foxgrove::app::{build_app, run};
use tracing::error;

fn main() -> ExitCode {
    let app = match build_app() {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "startup_failed");
            eprintln!("foxgrove: {err}");
            return ExitCode::FAILURE;
        }
    };
    run(app)
}
