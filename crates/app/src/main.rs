use std::env;
use std::process::ExitCode;

use huffpack::config::{print_help, Config};
use huffpack::{logging, report, run, Command, USAGE_EXIT};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("Try 'huffpack --help' for more information.");
            return ExitCode::from(USAGE_EXIT);
        }
    };

    logging::init(config.verbosity);
    if config.print_config {
        config.print();
    }

    report(run(&config))
}
