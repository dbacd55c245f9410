use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io;
use std::path::Path;

use bigfile_sweep::cli::{Cli, Command};
use bigfile_sweep::commands::{self, State};
use bigfile_sweep::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Dispatch to subcommand
    match cli.command {
        Command::Scan(args) => {
            let (config, state) = load(cli.config.as_deref(), cli.state_dir.as_deref())?;
            tracing::info!(?args, "Starting scan");
            commands::scan::run(args, &config, &state, cli.quiet)?;
        }
        Command::Threshold(args) => {
            let (_, state) = load(cli.config.as_deref(), cli.state_dir.as_deref())?;
            commands::threshold::run(args, &state)?;
        }
        Command::Cache(args) => {
            let (_, state) = load(cli.config.as_deref(), cli.state_dir.as_deref())?;
            commands::cache::run(args, &state)?;
        }
        Command::Reputation(args) => {
            let (config, state) = load(cli.config.as_deref(), cli.state_dir.as_deref())?;
            commands::reputation::run(args, &config, &state)?;
        }
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "bigfile-sweep", &mut io::stdout());
        }
        Command::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
    }

    Ok(())
}

/// Load configuration and open the state directory
fn load(config_path: Option<&Path>, state_dir: Option<&Path>) -> Result<(Config, State)> {
    let config = Config::load(config_path)?;
    tracing::debug!(?config, "Loaded configuration");

    let state = State::open(&config, state_dir);
    Ok((config, state))
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bigfile_sweep={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
