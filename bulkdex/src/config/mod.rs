//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/bulkdex/config.ini` with
//! three sections: `[api]` (remote endpoint), `[cache]` (storage
//! locations and sizes) and `[download]` (concurrency and retry
//! schedule). Every field has a default; a missing file or a missing
//! key never blocks a query.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::catalog::{DEFAULT_API_BASE_URL, DEFAULT_CATALOG_LIMIT};
use crate::fetch::{FetchPolicy, DEFAULT_FILL_CONCURRENCY};
use crate::store::DEFAULT_MEMORY_SIZE_BYTES;

/// Directory name under the platform config/cache roots.
pub const CONFIG_DIR_NAME: &str = "bulkdex";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform exposes no config directory.
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    /// The file exists but could not be read or parsed.
    #[error("failed to load config file")]
    Load(#[from] ini::Error),

    /// A key holds a value of the wrong shape.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Qualified key name (`section.key`).
        key: String,
        /// The offending value.
        value: String,
    },

    /// Writing the file failed.
    #[error("failed to write config file")]
    Write(#[from] std::io::Error),
}

/// `[api]` section: where the reference data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the remote API, without trailing slash.
    pub base_url: String,
    /// Number of catalog entries requested.
    pub catalog_limit: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[cache]` section: storage locations and sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory of the durable store.
    pub directory: PathBuf,
    /// Memory layer size budget in bytes.
    pub memory_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: default_cache_dir(),
            memory_size: DEFAULT_MEMORY_SIZE_BYTES,
        }
    }
}

/// `[download]` section: concurrency and retry schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Concurrent detail fetches during a cache fill.
    pub concurrency: usize,
    /// Attempt budget for the catalog fetch.
    pub catalog_attempts: u32,
    /// Base backoff for the catalog fetch, in milliseconds.
    pub catalog_backoff_ms: u64,
    /// Attempt budget for detail fetches.
    pub detail_attempts: u32,
    /// Base backoff for detail fetches, in milliseconds.
    pub detail_backoff_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        let catalog = FetchPolicy::catalog();
        let detail = FetchPolicy::detail();
        Self {
            concurrency: DEFAULT_FILL_CONCURRENCY,
            catalog_attempts: catalog.max_attempts,
            catalog_backoff_ms: catalog.base_backoff.as_millis() as u64,
            detail_attempts: detail.max_attempts,
            detail_backoff_ms: detail.base_backoff.as_millis() as u64,
        }
    }
}

impl DownloadConfig {
    /// The catalog retry policy these settings describe.
    pub fn catalog_policy(&self) -> FetchPolicy {
        FetchPolicy::new(
            self.catalog_attempts,
            std::time::Duration::from_millis(self.catalog_backoff_ms),
        )
    }

    /// The detail retry policy these settings describe.
    pub fn detail_policy(&self) -> FetchPolicy {
        FetchPolicy::new(
            self.detail_attempts,
            std::time::Duration::from_millis(self.detail_backoff_ms),
        )
    }
}

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Storage settings.
    pub cache: CacheConfig,
    /// Fetch settings.
    pub download: DownloadConfig,
}

/// Default location of the config file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Default durable-store directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CONFIG_DIR_NAME)
}

impl ConfigFile {
    /// Loads the config from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Loads the config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("api")) {
            if let Some(value) = section.get("base_url") {
                config.api.base_url = value.trim_end_matches('/').to_string();
            }
            if let Some(value) = section.get("catalog_limit") {
                config.api.catalog_limit = parse_field("api.catalog_limit", value)?;
            }
            if let Some(value) = section.get("timeout_secs") {
                config.api.timeout_secs = parse_field("api.timeout_secs", value)?;
            }
        }

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(value) = section.get("directory") {
                config.cache.directory = PathBuf::from(value);
            }
            if let Some(value) = section.get("memory_size") {
                config.cache.memory_size = parse_field("cache.memory_size", value)?;
            }
        }

        if let Some(section) = ini.section(Some("download")) {
            if let Some(value) = section.get("concurrency") {
                config.download.concurrency = parse_field("download.concurrency", value)?;
            }
            if let Some(value) = section.get("catalog_attempts") {
                config.download.catalog_attempts =
                    parse_field("download.catalog_attempts", value)?;
            }
            if let Some(value) = section.get("catalog_backoff_ms") {
                config.download.catalog_backoff_ms =
                    parse_field("download.catalog_backoff_ms", value)?;
            }
            if let Some(value) = section.get("detail_attempts") {
                config.download.detail_attempts = parse_field("download.detail_attempts", value)?;
            }
            if let Some(value) = section.get("detail_backoff_ms") {
                config.download.detail_backoff_ms =
                    parse_field("download.detail_backoff_ms", value)?;
            }
        }

        Ok(config)
    }

    /// Writes the config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("api"))
            .set("base_url", self.api.base_url.clone())
            .set("catalog_limit", self.api.catalog_limit.to_string())
            .set("timeout_secs", self.api.timeout_secs.to_string());
        ini.with_section(Some("cache"))
            .set("directory", self.cache.directory.display().to_string())
            .set("memory_size", self.cache.memory_size.to_string());
        ini.with_section(Some("download"))
            .set("concurrency", self.download.concurrency.to_string())
            .set("catalog_attempts", self.download.catalog_attempts.to_string())
            .set(
                "catalog_backoff_ms",
                self.download.catalog_backoff_ms.to_string(),
            )
            .set("detail_attempts", self.download.detail_attempts.to_string())
            .set(
                "detail_backoff_ms",
                self.download.detail_backoff_ms.to_string(),
            );

        ini.write_to_file(path)?;
        Ok(())
    }
}

fn parse_field<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Renders a byte count for humans (`1.5 MB`, `320 KB`, `17 B`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes:.0} B")
    }
}
