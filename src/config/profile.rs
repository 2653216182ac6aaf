//! Named monitor-layout profiles
//!
//! Each profile is a pretty-printed JSON file `<name>.json` in the profiles
//! directory. A hidden `.profile_order` file keeps the user's custom order.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::config;
use crate::types::Monitor;

/// Snapshot of a full monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub monitors: Vec<Monitor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filesystem-backed profile collection
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `<config_root>/profiles`
    pub fn in_config_root(config_root: &Path) -> Self {
        Self::new(config_root.join(config::PROFILES_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", config::PROFILE_EXTENSION))
    }

    fn order_path(&self) -> PathBuf {
        self.dir.join(config::PROFILE_ORDER_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create profiles directory {}", self.dir.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))
                .context("Failed to set profiles directory permissions")?;
        }
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.profile_path(name).exists()
    }

    /// Write a profile, keeping the original creation time when overwriting
    pub fn save(&self, name: &str, monitors: &[Monitor]) -> Result<()> {
        validate_profile_name(name)?;
        self.ensure_dir()?;

        let now = Utc::now();
        let created_at = if self.exists(name) {
            self.load(name).map(|existing| existing.created_at).unwrap_or(now)
        } else {
            now
        };

        let profile = Profile {
            name: name.to_string(),
            monitors: monitors.to_vec(),
            created_at,
            updated_at: now,
        };

        let path = self.profile_path(name);
        let json = serde_json::to_string_pretty(&profile).context("Failed to serialize profile")?;
        write_private(&path, json.as_bytes())
            .with_context(|| format!("Failed to write profile file {}", path.display()))?;

        info!(profile = %name, monitors = monitors.len(), "Saved profile");
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Profile> {
        let path = self.profile_path(name);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse profile {}", path.display()))
    }

    /// Profile names in directory order (sorted by name)
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read profiles directory {}", self.dir.display()))
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(config::PROFILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Profile names with the saved custom order applied first
    pub fn ordered_list(&self) -> Result<Vec<String>> {
        let names = self.list()?;
        let order = self.load_order().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable profile order file");
            Vec::new()
        });
        Ok(apply_order(names, &order))
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.profile_path(name);
        fs::remove_file(&path).with_context(|| format!("Failed to delete profile {}", path.display()))?;

        let order = self.load_order().unwrap_or_default();
        if order.iter().any(|entry| entry == name) {
            let order: Vec<String> = order.into_iter().filter(|entry| entry != name).collect();
            self.save_order(&order)?;
        }

        info!(profile = %name, "Deleted profile");
        Ok(())
    }

    /// Rename a profile, refusing to overwrite an existing one
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        if old_name == new_name {
            return Ok(());
        }
        validate_profile_name(new_name)?;
        if self.exists(new_name) {
            bail!("profile '{new_name}' already exists");
        }

        let profile = self
            .load(old_name)
            .with_context(|| format!("Failed to load profile '{old_name}'"))?;
        self.save(new_name, &profile.monitors)?;
        let path = self.profile_path(old_name);
        fs::remove_file(&path).with_context(|| format!("Failed to delete old profile {}", path.display()))?;

        let order = self.load_order().unwrap_or_default();
        if order.iter().any(|entry| entry == old_name) {
            let order: Vec<String> = order
                .into_iter()
                .map(|entry| if entry == old_name { new_name.to_string() } else { entry })
                .collect();
            self.save_order(&order)?;
        }

        info!(from = %old_name, to = %new_name, "Renamed profile");
        Ok(())
    }

    pub fn load_order(&self) -> Result<Vec<String>> {
        let path = self.order_path();
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse profile order {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read profile order {}", path.display())),
        }
    }

    pub fn save_order(&self, order: &[String]) -> Result<()> {
        self.ensure_dir()?;
        let path = self.order_path();
        let json = serde_json::to_string_pretty(order).context("Failed to serialize profile order")?;
        write_private(&path, json.as_bytes())
            .with_context(|| format!("Failed to write profile order {}", path.display()))?;
        debug!(count = order.len(), "Saved profile order");
        Ok(())
    }

    /// First profile (in custom order) whose layout matches `current`
    pub fn active_profile(&self, current: &[Monitor]) -> Result<Option<String>> {
        for name in self.ordered_list()? {
            match self.load(&name) {
                Ok(profile) if configurations_match(current, &profile.monitors) => return Ok(Some(name)),
                Ok(_) => {}
                Err(e) => warn!(profile = %name, error = %e, "Skipping unreadable profile"),
            }
        }
        Ok(None)
    }
}

/// Saved order first, then any profiles not mentioned in it
pub fn apply_order(names: Vec<String>, order: &[String]) -> Vec<String> {
    let mut remaining: HashSet<&str> = names.iter().map(String::as_str).collect();
    let mut ordered: Vec<String> = Vec::with_capacity(names.len());

    for name in order {
        if remaining.remove(name.as_str()) {
            ordered.push(name.clone());
        }
    }
    for name in &names {
        if remaining.contains(name.as_str()) {
            ordered.push(name.clone());
        }
    }
    ordered
}

/// Same monitor names with identical size, position and enabled state
pub fn configurations_match(current: &[Monitor], saved: &[Monitor]) -> bool {
    if current.len() != saved.len() {
        return false;
    }

    let saved_by_name: HashMap<&str, &Monitor> = saved.iter().map(|m| (m.name.as_str(), m)).collect();
    if saved_by_name.len() != saved.len() {
        return false;
    }

    current.iter().all(|cur| {
        saved_by_name.get(cur.name.as_str()).is_some_and(|sav| {
            cur.width == sav.width
                && cur.height == sav.height
                && cur.x == sav.x
                && cur.y == sav.y
                && cur.active == sav.active
        })
    })
}

/// Names become file names: no separators, no hidden files, no traversal
pub fn validate_profile_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Profile name cannot be empty");
    }
    if name.starts_with('.') {
        bail!("Profile name cannot start with '.'");
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        bail!("Profile name cannot contain path separators");
    }
    Ok(())
}

/// Turn free-form input into a usable profile name
pub fn sanitize_profile_name(input: &str) -> String {
    input
        .trim()
        .replace(['/', '\\'], "-")
        .replace("..", "")
        .trim_start_matches('.')
        .to_string()
}

fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
