use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::units::TemperatureUnit;

/// Environment variable holding the OpenWeather credential. It is read
/// once at process start; there is no runtime key rotation.
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

/// Sentinel values that setup tooling leaves behind when no real key was
/// configured. Treated the same as an absent key.
const PLACEHOLDER_KEYS: [&str; 2] = ["your_api_key_here", "REPLACE_WITH_YOUR_OPENWEATHER_API_KEY"];

/// Read the API key from the environment. Placeholder values count as
/// absent so dependent calls short-circuit instead of hitting the network
/// with a key that cannot work.
pub fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_VAR).ok().filter(|key| !is_placeholder(key))
}

pub fn is_placeholder(key: &str) -> bool {
    key.trim().is_empty() || PLACEHOLDER_KEYS.contains(&key)
}

/// Display preferences owned by the presentation layer, stored as a single
/// TOML blob under the platform config directory and written on every
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub unit: TemperatureUnit,
    pub dark_mode: bool,
}

impl Preferences {
    /// Load preferences from disk. Missing or malformed stored data falls
    /// back to defaults rather than failing the program.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!("ignoring stored preferences: {err:#}");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::file_path()?;
        if !path.exists() {
            // First run: nothing stored yet.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;

        let prefs: Preferences = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?;

        Ok(prefs)
    }

    /// Save preferences to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize preferences to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the preferences file.
    pub fn file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("preferences.toml"))
    }
}
