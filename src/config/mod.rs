//! Configuration management for HyprMon
//!
//! - **settings**: editor defaults (grid, snapping, log level) in TOML
//! - **profile**: named monitor layouts stored as JSON

pub mod profile;
pub mod settings;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use profile::{Profile, ProfileStore};
pub use settings::Settings;

use crate::constants::config;

/// Directory holding settings and profiles
///
/// `--cfg` overrides the default `<XDG config>/hyprmon`.
pub fn config_root(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    let base = dirs::config_dir().context("Failed to determine config directory (no XDG_CONFIG_HOME or HOME)")?;
    Ok(base.join(config::APP_DIR))
}

/// Log file location for TUI sessions
pub fn log_path() -> Result<PathBuf> {
    let cache = dirs::cache_dir().context("Failed to determine cache directory")?;
    Ok(cache.join(config::APP_DIR).join(config::LOG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let root = config_root(Some(Path::new("/tmp/hyprmon-test"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/hyprmon-test"));
        assert_eq!(
            ProfileStore::in_config_root(&root).dir(),
            Path::new("/tmp/hyprmon-test/profiles")
        );
    }
}
