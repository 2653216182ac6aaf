//! Editor settings stored as TOML next to the profiles directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{config, editing, validation};
use crate::snapping::SnapMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Grid quantization in world pixels (1 = off)
    #[serde(default = "default_grid_px")]
    pub grid_px: i32,

    #[serde(default)]
    pub snap_mode: SnapMode,

    /// Snap distance in world pixels (exclusive)
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: i32,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_grid_px() -> i32 {
    32
}

fn default_snap_threshold() -> i32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_px: default_grid_px(),
            snap_mode: SnapMode::default(),
            snap_threshold: default_snap_threshold(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn path(config_root: &Path) -> PathBuf {
        config_root.join(config::SETTINGS_FILENAME)
    }

    /// Load settings, writing a default file if none exists yet
    pub fn load(config_root: &Path) -> Result<Self> {
        let path = Self::path(config_root);

        let mut settings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            toml::from_str::<Settings>(&contents)
                .with_context(|| format!("Failed to parse TOML from {}", path.display()))?
        } else {
            info!(path = %path.display(), "Settings file not found, creating default");
            let settings = Settings::default();
            settings.save(config_root)?;
            settings
        };

        settings.apply_env_overrides();
        settings.validate_and_clamp();
        Ok(settings)
    }

    pub fn save(&self, config_root: &Path) -> Result<()> {
        let path = Self::path(config_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(grid) = parse_env::<i32>(config::GRID_PX_ENV) {
            self.grid_px = grid;
        }
        if let Some(threshold) = parse_env::<i32>(config::SNAP_THRESHOLD_ENV) {
            self.snap_threshold = threshold;
        }
    }

    /// Clamp values to what the editor supports
    fn validate_and_clamp(&mut self) {
        if !editing::GRID_SIZES.contains(&self.grid_px) {
            warn!(grid_px = self.grid_px, using = default_grid_px(), "Unsupported grid size, using default");
            self.grid_px = default_grid_px();
        }

        if self.snap_threshold < validation::MIN_SNAP_THRESHOLD {
            warn!(snap_threshold = self.snap_threshold, min = validation::MIN_SNAP_THRESHOLD, "snap_threshold below minimum, clamping");
            self.snap_threshold = validation::MIN_SNAP_THRESHOLD;
        } else if self.snap_threshold > validation::MAX_SNAP_THRESHOLD {
            warn!(snap_threshold = self.snap_threshold, max = validation::MAX_SNAP_THRESHOLD, "snap_threshold exceeds maximum, clamping");
            self.snap_threshold = validation::MAX_SNAP_THRESHOLD;
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = env::var(var).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = var, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.grid_px, 32);
        assert_eq!(settings.snap_mode, SnapMode::Edges);
        assert!(Settings::path(dir.path()).exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(Settings::path(dir.path()), "snap_mode = \"both\"\n").unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.snap_mode, SnapMode::Both);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_validate_and_clamp() {
        let mut settings = Settings {
            grid_px: 7,
            snap_threshold: 10_000,
            ..Settings::default()
        };
        settings.validate_and_clamp();
        assert_eq!(settings.grid_px, 32);
        assert_eq!(settings.snap_threshold, validation::MAX_SNAP_THRESHOLD);

        settings.snap_threshold = -3;
        settings.validate_and_clamp();
        assert_eq!(settings.snap_threshold, validation::MIN_SNAP_THRESHOLD);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(Settings::path(dir.path()), "grid_px = [").unwrap();
        assert!(Settings::load(dir.path()).is_err());
    }

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            grid_px: 64,
            snap_mode: SnapMode::Centers,
            snap_threshold: 25,
            log_level: "debug".to_string(),
        };
        settings.save(dir.path()).unwrap();
        let loaded = Settings::load(dir.path()).unwrap();
        assert_eq!(loaded, settings);
    }
}
