//! Configuration persistence utilities
//!
//! Loads and saves the dial's settings as TOML under the platform config directory.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error while reading/writing config
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Get the base configuration directory for the sun dial
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "sun-dial", "sun-dial").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the configuration file path for a named settings file
pub fn config_path(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", name)))
}

/// Parse a configuration value from TOML text
pub fn parse_config<T: DeserializeOwned>(contents: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Render a configuration value as pretty TOML text
pub fn render_config<T: Serialize>(config: &T) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Load a named configuration file
///
/// Returns `None` if the config file doesn't exist yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_config<T: DeserializeOwned>(name: &str) -> Result<Option<T>, ConfigError> {
    let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;

    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    parse_config(&contents).map(Some)
}

/// Save a named configuration file
pub fn save_config<T: Serialize>(name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, render_config(config)?)?;
    log::debug!("Saved config to {}", path.display());
    Ok(())
}
