/// Configuration loading from TOML file
use std::path::Path;

use crate::error::{Result, TrackerError};
use crate::time::CivilZone;
use crate::types::Config;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TrackerError::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| TrackerError::ConfigError(format!("Failed to parse config: {}", e)))?;

    // Validate config
    validate_config(&config)?;

    Ok(config)
}

/// Like `load_config`, but a missing file means built-in defaults
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    if !path.as_ref().exists() {
        let config = Config::default();
        validate_config(&config)?;
        return Ok(config);
    }

    load_config(path)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.feed_url.trim().is_empty() {
        return Err(TrackerError::ConfigError("feed_url is empty".to_string()));
    }

    if config.history_path.trim().is_empty() {
        return Err(TrackerError::ConfigError("history_path is empty".to_string()));
    }

    if config.poll_interval_sec == 0 {
        return Err(TrackerError::ConfigError("poll_interval_sec must be > 0".to_string()));
    }

    if config.request_timeout_sec == 0 {
        return Err(TrackerError::ConfigError("request_timeout_sec must be > 0".to_string()));
    }

    if config.results_limit == 0 {
        return Err(TrackerError::ConfigError("results_limit must be > 0".to_string()));
    }

    // Offset range and zone name
    CivilZone::from_config(config.utc_offset_minutes, config.iana_zone.as_deref())?;

    Ok(())
}
