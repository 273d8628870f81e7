// ABOUTME: Entry point for the simongpt-deploy CLI application.
// ABOUTME: Parses arguments, sets up logging and maps failures to exit codes.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use simongpt_deploy::config;
use simongpt_deploy::error::Result;
use simongpt_deploy::orchestrator::RunOptions;
use simongpt_deploy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(e.stage(), &e.to_string());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let settings_path = cli.settings.as_deref();

    match cli.command {
        Commands::Init {
            registry,
            remote,
            force,
        } => {
            let cwd = env::current_dir()?;
            config::init_settings(&cwd, registry.as_deref(), remote.as_deref(), force)?;
            output.success(&format!("Wrote {}", config::SETTINGS_FILENAME));
            Ok(())
        }
        Commands::Config { params, overrides } => {
            let settings = commands::load_settings(settings_path, &overrides)?;
            commands::show_config(
                &params.invocation_params(),
                &params.env_file,
                &settings,
                &output,
            )
        }
        Commands::Build {
            params,
            overrides,
            dry_run,
        } => {
            let settings = commands::load_settings(settings_path, &overrides)?;
            commands::build(
                &params.invocation_params(),
                &params.env_file,
                &settings,
                dry_run,
                output,
            )
            .await
        }
        Commands::Deploy {
            params,
            overrides,
            dry_run,
            lock,
            force_lock,
        } => {
            let settings = commands::load_settings(settings_path, &overrides)?;
            commands::deploy(
                &params.invocation_params(),
                &params.env_file,
                &settings,
                RunOptions { lock, force_lock },
                dry_run,
                output,
            )
            .await
        }
    }
}
