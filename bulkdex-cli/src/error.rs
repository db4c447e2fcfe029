//! CLI error type.

use std::fmt;

use bulkdex::config::ConfigError;
use bulkdex::fetch::FetchError;
use bulkdex::run::RunError;
use bulkdex::typing::{TypeId, UnknownType};

/// Errors surfaced to the terminal with a non-zero exit code.
#[derive(Debug)]
pub enum CliError {
    /// Failed to create the Tokio runtime.
    Runtime(std::io::Error),

    /// A query run failed.
    Run(RunError),

    /// Could not construct the fetch stack.
    Fetch(FetchError),

    /// Configuration could not be loaded or written.
    Config(ConfigError),

    /// A type argument named no known type.
    InvalidType(UnknownType),

    /// Clearing the cache failed.
    CacheClear(String),

    /// Reading cache statistics failed.
    CacheStats(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Runtime(e) => write!(f, "failed to create async runtime: {e}"),
            CliError::Run(e) => write!(f, "{e}"),
            CliError::Fetch(e) => write!(f, "{e}"),
            CliError::Config(e) => write!(f, "{e}"),
            CliError::InvalidType(e) => {
                let names: Vec<&str> = TypeId::ALL.iter().map(|t| t.as_str()).collect();
                write!(f, "{e} (valid types: {})", names.join(", "))
            }
            CliError::CacheClear(msg) => write!(f, "failed to clear cache: {msg}"),
            CliError::CacheStats(msg) => write!(f, "failed to read cache stats: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Run(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::InvalidType(e) => Some(e),
            CliError::CacheClear(_) | CliError::CacheStats(_) => None,
        }
    }
}

impl From<RunError> for CliError {
    fn from(e: RunError) -> Self {
        CliError::Run(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<UnknownType> for CliError {
    fn from(e: UnknownType) -> Self {
        CliError::InvalidType(e)
    }
}
