pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        config::verbose_log_filter()
    } else {
        config::default_log_filter()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let result = match &cli.command {
        Command::Batch(args) => commands::batch::execute(args).map(|_| ()),
        Command::Predict(args) => commands::predict::execute(args),
        Command::Prepare(args) => commands::prepare::execute(args).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
