// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockership")]
#[command(about = "Build-and-replace container deployments with dependency-aware restarts")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: discovered from the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a revision of a project and replace its running container
    Deploy {
        /// Project to deploy
        project: String,

        /// Environment whose endpoints receive the deploy
        #[arg(short, long)]
        env: String,

        /// Revision to build (commit hash or version)
        #[arg(short, long)]
        revision: String,
    },

    /// Remove a project's containers and prune its images
    Clean {
        /// Project to clean
        project: String,

        /// Environment to clean
        #[arg(short, long)]
        env: String,
    },

    /// Show images and containers of projects on each endpoint
    Status {
        /// Project to show (default: all)
        project: Option<String>,

        /// Environment to inspect
        #[arg(short, long)]
        env: String,
    },
}
