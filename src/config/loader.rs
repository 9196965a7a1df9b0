//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::EngineConfig;
use crate::error::ConfigError;

/// Standard locations to search for caro.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "caro.toml",    // Current directory
    "../caro.toml", // Parent directory (when running from subdirectory)
];

/// Load the engine configuration, never failing.
///
/// Searches for caro.toml in the following order:
/// 1. Path specified by the CARO_CONFIG environment variable
/// 2. Current directory (caro.toml)
/// 3. Parent directory (../caro.toml)
///
/// A file that cannot be read, parsed or validated is reported with a
/// warning and replaced by the defaults. Environment overrides are applied
/// last.
pub fn load_config() -> EngineConfig {
    if let Ok(path) = std::env::var("CARO_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading config from CARO_CONFIG: {}", path.display());
            return load_or_default(&path);
        }
        warn!("CARO_CONFIG={} not found, searching defaults", path.display());
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_or_default(path);
        }
    }

    debug!("No caro.toml found, using built-in defaults");
    apply_env_overrides(EngineConfig::default())
}

fn load_or_default(path: &Path) -> EngineConfig {
    load_from_path(path).unwrap_or_else(|e| {
        warn!("{e}, using defaults");
        apply_env_overrides(EngineConfig::default())
    })
}

/// Load configuration from a specific path.
///
/// Strict: read, parse and validation failures are returned.
pub fn load_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let config = apply_env_overrides(config);
    config.validate()?;
    Ok(config)
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $field:ident, $lookup:expr, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $config.$field = v;
        }
    };
    // Parseable field (usize, u64, ...)
    ($config:expr, $field:ident, $lookup:expr, $key:expr, parse) => {
        match $lookup($key).map(|s| s.trim().parse()) {
            Some(Ok(v)) => $config.$field = v,
            Some(Err(_)) => warn!("Ignoring unparseable {}", $key),
            None => {}
        }
    };
    // Optional parseable field
    ($config:expr, $field:ident, $lookup:expr, $key:expr, optional_parse) => {
        match $lookup($key).map(|s| s.trim().parse()) {
            Some(Ok(v)) => $config.$field = Some(v),
            Some(Err(_)) => warn!("Ignoring unparseable {}", $key),
            None => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: CARO_<KEY>
pub fn apply_env_overrides(config: EngineConfig) -> EngineConfig {
    overrides_from(config, |key| std::env::var(key).ok())
}

pub(super) fn overrides_from<F>(mut config: EngineConfig, lookup: F) -> EngineConfig
where
    F: Fn(&str) -> Option<String>,
{
    env_override!(config, board_size, lookup, "CARO_BOARD_SIZE", parse);
    env_override!(config, cache_capacity, lookup, "CARO_CACHE_CAPACITY", parse);
    env_override!(config, log_level, lookup, "CARO_LOG_LEVEL");
    env_override!(config, seed, lookup, "CARO_SEED", optional_parse);
    config
}
