//! # lexgraph CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lexgraph_cli::build::{run_build, BuildArgs};
use lexgraph_cli::config::LexgraphConfig;
use lexgraph_cli::inspect::{run_inspect, InspectArgs};
use lexgraph_cli::prepare::{run_prepare, PrepareArgs};
use lexgraph_cli::status::{run_status, StatusArgs};

/// lexgraph: regulation graph builder and effectiveness annotator.
///
/// Shapes raw regulation documents into record batches, builds the
/// regulation graph, marks which regulations, articles and article
/// successions are currently effective, and exports the result.
#[derive(Parser, Debug)]
#[command(name = "lexgraph", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shape raw regulation documents into batch files.
    Prepare(PrepareArgs),

    /// Build and annotate the graph; optionally export it.
    Build(BuildArgs),

    /// Show an article's successions and current version.
    Inspect(InspectArgs),

    /// Check that every expected batch is present and non-empty.
    Status(StatusArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = LexgraphConfig::load(cli.config.as_deref()).and_then(|config| {
        tracing::debug!(?config, "configuration loaded");
        match cli.command {
            Commands::Prepare(args) => run_prepare(&args),
            Commands::Build(args) => run_build(&args, &config),
            Commands::Inspect(args) => run_inspect(&args, &config),
            Commands::Status(args) => run_status(&args),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
