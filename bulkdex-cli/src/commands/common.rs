//! Shared helpers for CLI commands.

use bulkdex::config::ConfigFile;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Initializes logging from `RUST_LOG`.
///
/// Defaults to warnings only: query results and progress own stdout,
/// diagnostics go to stderr when asked for.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, falling back to defaults when absent or
/// unreadable.
pub fn load_config() -> ConfigFile {
    ConfigFile::load().unwrap_or_default()
}

/// Builds the runtime that commands run their async work on.
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new().map_err(CliError::Runtime)
}
