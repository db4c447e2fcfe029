//! Bulkdex CLI.
//!
//! Command-line interface to the bulkdex library: bulk similarity
//! queries, type matchup analysis, and cache/config maintenance.

mod commands;
mod error;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "bulkdex",
    version,
    about = "Defensive bulk comparison and type matchup analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the species closest to a defensive stat profile
    Bulk(commands::bulk::BulkArgs),
    /// Analyze a typing against the full type chart
    Typing(commands::typing::TypingArgs),
    /// Inspect or clear the durable cache
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    commands::common::init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Bulk(args) => commands::bulk::run(args),
        Command::Typing(args) => commands::typing::run(args),
        Command::Cache { action } => commands::cache::run(action),
        Command::Config { action } => commands::config::run(action),
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
