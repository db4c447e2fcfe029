//! Cache management CLI commands.

use clap::Subcommand;

use bulkdex::config::format_size;
use bulkdex::store::{clear_disk_store, disk_store_stats};

use super::common;
use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Clear the durable cache, removing the catalog and every stored record
    Clear,
    /// Show durable cache statistics
    Stats,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction) -> Result<(), CliError> {
    let config = common::load_config();
    let cache_dir = &config.cache.directory;

    match action {
        CacheAction::Clear => {
            println!("Clearing cache at: {}", cache_dir.display());

            match clear_disk_store(cache_dir) {
                Ok(result) => {
                    println!(
                        "Deleted {} files, freed {}",
                        result.files_deleted,
                        format_size(result.bytes_freed)
                    );
                    Ok(())
                }
                Err(e) => Err(CliError::CacheClear(e.to_string())),
            }
        }
        CacheAction::Stats => {
            println!("Durable cache: {}", cache_dir.display());

            match disk_store_stats(cache_dir) {
                Ok((files, bytes)) => {
                    println!("  Entries: {}", files);
                    println!("  Size:    {}", format_size(bytes));
                    Ok(())
                }
                Err(e) => Err(CliError::CacheStats(e.to_string())),
            }
        }
    }
}
