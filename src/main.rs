use std::process::ExitCode;

use quad_core::{init_logging, AppConfig, LoggingConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match quad_core::run(AppConfig::from_env()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
