use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use beanstalker::remote::aws::AwsConnector;
use beanstalker::{Cli, SettingsLoader, StdinPrompt, Syncer};

/// Filter used by `--verbose`: our own debug events, everything else at warn.
const VERBOSE_FILTER: &str = "warn,beanstalker=debug";

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    // Usage errors are reported before any settings file is read.
    let action = match cli.into_action() {
        Ok(action) => action,
        Err(e) => {
            println!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let settings = match SettingsLoader::new()
        .cli_override("log_filter", verbose.then_some(VERBOSE_FILTER))
        .load()
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings:\n{e}");
            return ExitCode::from(e.exit_code());
        }
    };
    init_tracing(&settings.log_filter);

    let mut syncer = Syncer::new(AwsConnector, settings, StdinPrompt::stdio(), io::stdout());
    match syncer.run(&action) {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
