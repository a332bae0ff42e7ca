// ABOUTME: Entry point for the dockership CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use dockership::config::Config;
use dockership::error::Result;
use dockership::output::{Output, OutputMode};
use dockership::types::Revision;
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

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));
    let mode = output.mode();

    if let Err(e) = run(cli, output).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Deploy {
            project,
            env,
            revision,
        } => {
            let revision = Revision::new(&revision)?;
            commands::deploy(&config, &project, &env, &revision, output).await
        }
        Commands::Clean { project, env } => commands::clean(&config, &project, &env, output).await,
        Commands::Status { project, env } => {
            commands::status(&config, project.as_deref(), &env, output).await
        }
    }
}
