//! huffpack: command-line front-end for `huffpack-core`.
//!
//! The `huffpack` binary takes flags; the four fixed programs mirror the
//! classic `<program> InputFile OutputFile` interface. Both share the
//! configuration, logging and run logic here.

use std::process::ExitCode;

use huffpack_core::{CodecStats, Direction, Result, Variant};

pub mod config;
pub mod logging;
pub mod run;

pub use config::{Command, Config};
pub use run::run;

/// Exit code for command-line mistakes.
pub const USAGE_EXIT: u8 = 2;

/// Map a run result to the process exit code, reporting any error.
pub fn report(result: Result<CodecStats>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Entry point shared by the fixed-purpose programs.
pub fn run_fixed(program: &str, variant: Variant, direction: Direction) -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::fixed(variant, direction, &args) {
        Ok(config) => config,
        Err(_) => {
            eprintln!("{}", config::fixed_usage(program));
            return ExitCode::from(USAGE_EXIT);
        }
    };

    logging::init(0);
    report(run(&config))
}
