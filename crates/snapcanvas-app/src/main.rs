//! Command-line entry point.

use clap::Parser;
use snapcanvas_app::{Cli, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("snapcanvas: {e}");
            ExitCode::FAILURE
        }
    }
}
