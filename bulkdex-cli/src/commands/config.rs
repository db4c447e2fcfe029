//! Configuration CLI commands.

use clap::Subcommand;

use bulkdex::config::{default_config_path, format_size, ConfigError, ConfigFile};

use super::common;
use crate::error::CliError;

/// Config action subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Write a default config file to the standard location
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => {
            let config = common::load_config();

            println!("[api]");
            println!("  base_url      = {}", config.api.base_url);
            println!("  catalog_limit = {}", config.api.catalog_limit);
            println!("  timeout_secs  = {}", config.api.timeout_secs);
            println!("[cache]");
            println!("  directory     = {}", config.cache.directory.display());
            println!(
                "  memory_size   = {}",
                format_size(config.cache.memory_size)
            );
            println!("[download]");
            println!("  concurrency        = {}", config.download.concurrency);
            println!(
                "  catalog retry      = {} attempts, {} ms base backoff",
                config.download.catalog_attempts, config.download.catalog_backoff_ms
            );
            println!(
                "  detail retry       = {} attempts, {} ms base backoff",
                config.download.detail_attempts, config.download.detail_backoff_ms
            );
            Ok(())
        }
        ConfigAction::Init { force } => {
            let path = default_config_path().ok_or(CliError::Config(ConfigError::NoConfigDir))?;

            if path.exists() && !force {
                println!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
                return Ok(());
            }

            ConfigFile::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}
