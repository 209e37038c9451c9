mod schema;

pub use schema::{ColorMode, Settings};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/method-selector/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("method-selector"))
}

/// Get the default config file path (~/.config/method-selector/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load user settings from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/method-selector/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file is not an error; defaults are used instead.
pub fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => match get_config_path() {
            Some(p) => (p, false),
            None => return Ok(Settings::default()),
        },
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Settings::default());
    }

    read_settings(&config_path)
}

fn read_settings(config_path: &Path) -> Result<Settings> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let settings: Settings = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "config loaded");
    Ok(settings)
}
