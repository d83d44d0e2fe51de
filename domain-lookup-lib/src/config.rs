//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and environment
//! variables, and merging them with proper precedence rules:
//!
//! 1. CLI arguments (applied by the caller)
//! 2. Environment variables (`DL_*`)
//! 3. Local config file (`./.domain-lookup.toml` or `./domain-lookup.toml`)
//! 4. Global config file (`~/.domain-lookup.toml`)
//! 5. XDG config file (`~/.config/domain-lookup/config.toml`)
//! 6. Built-in defaults

use crate::error::LookupError;
use crate::types::LookupConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Maximum lookups in flight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Bootstrap document URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_url: Option<String>,

    /// Bootstrap fetch timeout (as string, e.g., "10s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_timeout: Option<String>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, LookupError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LookupError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            LookupError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Files that exist but fail to parse are reported and skipped.
    pub fn discover_and_load(&self) -> Result<FileConfig, LookupError> {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "Loaded configuration file");
                    merged_config = self.merge_configs(merged_config, config);
                }
                Err(e) => {
                    if self.verbose {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring configuration file");
                    }
                }
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./.domain-lookup.toml", "./domain-lookup.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".domain-lookup.toml");
        path.exists().then_some(path)
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-lookup").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.bootstrap_url.is_some() {
                        lower_defaults.bootstrap_url = higher_defaults.bootstrap_url;
                    }
                    if higher_defaults.bootstrap_timeout.is_some() {
                        lower_defaults.bootstrap_timeout = higher_defaults.bootstrap_timeout;
                    }
                    Some(lower_defaults)
                }
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), LookupError> {
        if let Some(defaults) = &config.defaults {
            if defaults.concurrency == Some(0) {
                return Err(LookupError::config("Concurrency must be at least 1"));
            }

            if let Some(url) = &defaults.bootstrap_url {
                if url.trim().is_empty() {
                    return Err(LookupError::config("Bootstrap URL cannot be empty"));
                }
            }

            if let Some(timeout_str) = &defaults.bootstrap_timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(LookupError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub bootstrap_url: Option<String>,
    pub bootstrap_timeout: Option<String>,
}

/// Load configuration from `DL_*` environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

fn env_config_from<F>(get: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = get("DL_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) if concurrency > 0 => {
                tracing::debug!(concurrency, "Using DL_CONCURRENCY");
                env_config.concurrency = Some(concurrency);
            }
            _ => tracing::warn!(value = %val, "Invalid DL_CONCURRENCY, must be a positive integer"),
        }
    }

    if let Some(url) = get("DL_BOOTSTRAP_URL") {
        if !url.trim().is_empty() {
            tracing::debug!(%url, "Using DL_BOOTSTRAP_URL");
            env_config.bootstrap_url = Some(url);
        }
    }

    if let Some(timeout_str) = get("DL_BOOTSTRAP_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            env_config.bootstrap_timeout = Some(timeout_str);
        } else {
            tracing::warn!(
                value = %timeout_str,
                "Invalid DL_BOOTSTRAP_TIMEOUT, use format like '5s', '30s', '2m'"
            );
        }
    }

    env_config
}

/// Resolve the effective configuration from file and environment layers.
///
/// CLI overrides are applied by the caller on the returned value.
pub fn resolve_config(file: &FileConfig, env_config: &EnvConfig) -> LookupConfig {
    let mut config = LookupConfig::default();

    if let Some(defaults) = &file.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(url) = &defaults.bootstrap_url {
            config = config.with_bootstrap_url(url.clone());
        }
        if let Some(secs) = defaults
            .bootstrap_timeout
            .as_deref()
            .and_then(parse_timeout_string)
        {
            config = config.with_bootstrap_timeout(Duration::from_secs(secs));
        }
    }

    if let Some(concurrency) = env_config.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(url) = &env_config.bootstrap_url {
        config = config.with_bootstrap_url(url.clone());
    }
    if let Some(secs) = env_config
        .bootstrap_timeout
        .as_deref()
        .and_then(parse_timeout_string)
    {
        config = config.with_bootstrap_timeout(Duration::from_secs(secs));
    }

    config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}
