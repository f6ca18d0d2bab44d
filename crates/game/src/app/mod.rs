use std::process::ExitCode;

use tracing::error;

mod bootstrap;
mod gameplay;
mod loop_runner;

pub(crate) fn run() -> ExitCode {
    bootstrap::init_tracing();
    let wiring = match bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(error) => {
            error!(error = %error, "content_load_failed");
            return ExitCode::FAILURE;
        }
    };
    loop_runner::run(wiring)
}
