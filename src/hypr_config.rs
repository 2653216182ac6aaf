//! Hyprland monitor rules and `hyprland.conf` rewriting

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

use crate::constants::hypr_config;
use crate::types::{is_valid_monitor_name, ColorMode, Monitor};

/// Monitor rule as accepted by `hyprctl keyword monitor` and `monitor=`
///
/// Inactive monitors become `NAME,disable`. Mirrored monitors carry only the
/// base fields plus `mirror,SOURCE`; everything else appends the advanced
/// settings that differ from Hyprland's defaults.
pub fn monitor_rule(monitor: &Monitor) -> Result<String> {
    if !is_valid_monitor_name(&monitor.name) {
        bail!("invalid monitor name: {:?}", monitor.name);
    }

    if !monitor.active {
        return Ok(format!("{},disable", monitor.name));
    }

    let mut rule = format!(
        "{},{}x{}@{:.2},{}x{},{:.2}",
        monitor.name, monitor.width, monitor.height, monitor.refresh_rate, monitor.x, monitor.y, monitor.scale
    );

    if let Some(source) = &monitor.mirror_source {
        if !is_valid_monitor_name(source) {
            bail!("invalid mirror source name: {source:?}");
        }
        rule.push_str(&format!(",mirror,{source}"));
        return Ok(rule);
    }

    if monitor.bit_depth == 10 {
        rule.push_str(",bitdepth,10");
    }
    if monitor.color_mode != ColorMode::Srgb {
        rule.push_str(&format!(",cm,{}", monitor.color_mode.as_str()));
    }
    if monitor.color_mode.is_hdr() {
        if monitor.sdr_brightness != 1.0 {
            rule.push_str(&format!(",sdrbrightness,{:.2}", monitor.sdr_brightness));
        }
        if monitor.sdr_saturation != 1.0 {
            rule.push_str(&format!(",sdrsaturation,{:.2}", monitor.sdr_saturation));
        }
    }
    if monitor.vrr.index() > 0 {
        rule.push_str(&format!(",vrr,{}", monitor.vrr.index()));
    }
    if monitor.transform.index() > 0 {
        rule.push_str(&format!(",transform,{}", monitor.transform.index()));
    }

    Ok(rule)
}

/// Full config-file lines (`monitor=...`) for a monitor set
pub fn monitor_lines(monitors: &[Monitor]) -> Result<Vec<String>> {
    monitors
        .iter()
        .map(|m| monitor_rule(m).map(|rule| format!("{}={rule}", hypr_config::MONITOR_KEY)))
        .collect()
}

/// Resolve the Hyprland config path
///
/// `$HYPRLAND_CONFIG` must be absolute and free of `..`; otherwise
/// `~/.config/hypr/hyprland.conf` is used.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(raw) = env::var(hypr_config::PATH_ENV)
        && !raw.is_empty()
    {
        return validate_override(Path::new(&raw));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(hypr_config::DEFAULT_RELATIVE_PATH))
}

fn validate_override(path: &Path) -> Result<PathBuf> {
    if !path.is_absolute() {
        bail!("{} must be an absolute path, got {}", hypr_config::PATH_ENV, path.display());
    }
    if path.components().any(|c| c == Component::ParentDir) {
        bail!("{} must not contain '..', got {}", hypr_config::PATH_ENV, path.display());
    }
    Ok(path.to_path_buf())
}

fn is_monitor_line(trimmed: &str) -> bool {
    let key = hypr_config::MONITOR_KEY;
    trimmed
        .strip_prefix(key)
        .is_some_and(|rest| rest.starts_with('=') || rest.starts_with(' '))
}

/// Replace the monitor lines of a config file
///
/// Every existing monitor line is dropped and the new lines take the place
/// of the first one. Blank lines inside the monitor block are kept; the
/// block ends at the first other non-blank line. Without any monitor line
/// the new block is appended after a blank line.
pub fn rewrite_monitor_block(contents: &str, new_lines: &[String]) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_block = false;
    let mut written = false;

    for line in contents.split('\n') {
        let trimmed = line.trim();

        if is_monitor_line(trimmed) {
            if !written {
                out.extend(new_lines.iter().map(String::as_str));
                written = true;
            }
            in_block = true;
            continue;
        }

        if in_block && !trimmed.is_empty() && !trimmed.starts_with(hypr_config::MONITOR_KEY) {
            in_block = false;
        }

        if !in_block || trimmed.is_empty() {
            out.push(line);
        }
    }

    if !written {
        out.push("");
        out.extend(new_lines.iter().map(String::as_str));
    }

    out.join("\n")
}

/// Back up the config and write the monitor block through the existing file
///
/// Returns the backup path. Writing through the open file keeps symlinked
/// configs pointing where they did.
pub fn write_config(path: &Path, monitors: &[Monitor]) -> Result<PathBuf> {
    let lines = monitor_lines(monitors)?;

    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read Hyprland config {}", path.display()))?;

    let backup = backup_path(path, Utc::now().timestamp());
    fs::write(&backup, &original)
        .with_context(|| format!("Failed to create backup {}", backup.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(&backup, fs::Permissions::from_mode(0o600)) {
            warn!(backup = %backup.display(), error = %e, "Failed to restrict backup permissions");
        }
    }

    let updated = rewrite_monitor_block(&original, &lines);

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open config for writing {}", path.display()))?;
    file.write_all(updated.as_bytes())
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync config {}", path.display()))?;

    info!(path = %path.display(), backup = %backup.display(), monitors = monitors.len(), "Wrote monitor configuration");
    Ok(backup)
}

pub fn backup_path(path: &Path, timestamp: i64) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".bak.{timestamp}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Transform, Vrr};
    use tempfile::TempDir;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rule_basic() {
        let mon = Monitor::new("DP-1", 2560, 1440, 143.97).at(1920, 0).with_scale(1.25);
        assert_eq!(monitor_rule(&mon).unwrap(), "DP-1,2560x1440@143.97,1920x0,1.25");
    }

    #[test]
    fn test_rule_disabled() {
        let mon = Monitor::new("HDMI-A-1", 1920, 1080, 60.0).inactive();
        assert_eq!(monitor_rule(&mon).unwrap(), "HDMI-A-1,disable");
    }

    #[test]
    fn test_rule_negative_position() {
        let mon = Monitor::new("DP-2", 1920, 1080, 60.0).at(-1920, -200);
        assert_eq!(monitor_rule(&mon).unwrap(), "DP-2,1920x1080@60.00,-1920x-200,1.00");
    }

    #[test]
    fn test_rule_advanced_settings() {
        let mut mon = Monitor::new("DP-1", 3840, 2160, 120.0).with_transform(Transform::Rotate270);
        mon.bit_depth = 10;
        mon.color_mode = ColorMode::Hdr;
        mon.sdr_brightness = 1.2;
        mon.vrr = Vrr::Fullscreen;
        assert_eq!(
            monitor_rule(&mon).unwrap(),
            "DP-1,3840x2160@120.00,0x0,1.00,bitdepth,10,cm,hdr,sdrbrightness,1.20,vrr,2,transform,3"
        );
    }

    #[test]
    fn test_rule_sdr_ignored_outside_hdr() {
        let mut mon = Monitor::new("DP-1", 1920, 1080, 60.0);
        mon.color_mode = ColorMode::Wide;
        mon.sdr_saturation = 1.4;
        assert_eq!(monitor_rule(&mon).unwrap(), "DP-1,1920x1080@60.00,0x0,1.00,cm,wide");
    }

    #[test]
    fn test_rule_mirror_skips_advanced() {
        let mut mon = Monitor::new("HDMI-A-1", 1920, 1080, 60.0).with_transform(Transform::Rotate90);
        mon.mirror_source = Some("eDP-1".to_string());
        mon.bit_depth = 10;
        assert_eq!(monitor_rule(&mon).unwrap(), "HDMI-A-1,1920x1080@60.00,0x0,1.00,mirror,eDP-1");
    }

    #[test]
    fn test_rule_rejects_bad_names() {
        let mon = Monitor::new("DP-1\"; reboot", 1920, 1080, 60.0);
        assert!(monitor_rule(&mon).is_err());

        let mut mon = Monitor::new("DP-1", 1920, 1080, 60.0);
        mon.mirror_source = Some("$(id)".to_string());
        assert!(monitor_rule(&mon).is_err());
    }

    #[test]
    fn test_rewrite_replaces_block_in_place() {
        let contents = "# top\nmonitor=DP-1,preferred,auto,1\n\nmonitor = HDMI-A-1,disable\nexec-once = waybar\n";
        let updated = rewrite_monitor_block(contents, &lines(&["monitor=NEW,disable"]));
        assert_eq!(updated, "# top\nmonitor=NEW,disable\n\nexec-once = waybar\n");
    }

    #[test]
    fn test_rewrite_drops_later_monitor_lines() {
        let contents = "monitor=A,disable\ninput {\n}\nmonitor=B,disable";
        let updated = rewrite_monitor_block(contents, &lines(&["monitor=X,disable", "monitor=Y,disable"]));
        assert_eq!(updated, "monitor=X,disable\nmonitor=Y,disable\ninput {\n}");
    }

    #[test]
    fn test_rewrite_appends_when_missing() {
        let contents = "general {\n}\n";
        let updated = rewrite_monitor_block(contents, &lines(&["monitor=DP-1,disable"]));
        assert_eq!(updated, "general {\n}\n\n\nmonitor=DP-1,disable");
    }

    #[test]
    fn test_rewrite_ignores_similar_keys() {
        let contents = "monitorfoo=1\n";
        let updated = rewrite_monitor_block(contents, &lines(&["monitor=DP-1,disable"]));
        assert!(updated.starts_with("monitorfoo=1\n"));
        assert!(updated.ends_with("monitor=DP-1,disable"));
    }

    #[test]
    fn test_override_path_validation() {
        assert!(validate_override(Path::new("relative/hyprland.conf")).is_err());
        assert!(validate_override(Path::new("/etc/../root/hyprland.conf")).is_err());
        assert_eq!(
            validate_override(Path::new("/home/u/hyprland.conf")).unwrap(),
            PathBuf::from("/home/u/hyprland.conf")
        );
    }

    #[test]
    fn test_backup_path_appends_timestamp() {
        assert_eq!(
            backup_path(Path::new("/tmp/hyprland.conf"), 1700000000),
            PathBuf::from("/tmp/hyprland.conf.bak.1700000000")
        );
    }

    #[test]
    fn test_write_config_creates_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hyprland.conf");
        fs::write(&path, "monitor=OLD,disable\nbind = SUPER, Q, exit\n").unwrap();

        let monitors = vec![Monitor::new("DP-1", 1920, 1080, 60.0)];
        let backup = write_config(&path, &monitors).unwrap();

        assert_eq!(fs::read_to_string(&backup).unwrap(), "monitor=OLD,disable\nbind = SUPER, Q, exit\n");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "monitor=DP-1,1920x1080@60.00,0x0,1.00\nbind = SUPER, Q, exit\n"
        );
    }

    #[test]
    fn test_write_config_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.conf");
        assert!(write_config(&path, &[]).is_err());
    }

    #[test]
    fn test_write_config_invalid_monitor_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hyprland.conf");
        fs::write(&path, "monitor=OLD,disable\n").unwrap();
        let monitors = vec![Monitor::new("bad name", 1920, 1080, 60.0)];
        assert!(write_config(&path, &monitors).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "monitor=OLD,disable\n");
    }
}
