//! Thin wrapper around the `hyprctl` CLI
//!
//! Every call runs `hyprctl` directly with an argv list (no shell) and is
//! killed after a fixed timeout.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::constants::hyprctl;
use crate::hypr_config::monitor_rule;
use crate::types::{Mode, Monitor, Transform, Vrr};

/// Run hyprctl with `args`, returning stdout
pub fn run(args: &[&str]) -> Result<String> {
    debug!(args = ?args, "Running hyprctl");
    run_command(hyprctl::BINARY, args, Duration::from_secs(hyprctl::TIMEOUT_SECS))
}

/// Read a child pipe to the end on its own thread so the child never blocks on it
fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buf = String::new();
        pipe.read_to_string(&mut buf).map(|_| buf)
    })
}

fn collect(reader: thread::JoinHandle<std::io::Result<String>>, stream: &str) -> Result<String> {
    reader
        .join()
        .map_err(|_| anyhow!("{stream} reader panicked"))?
        .with_context(|| format!("Failed to read {stream}"))
}

/// Run `program` with `args`, killing it after `timeout`
fn run_command(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to execute {program} {args:?}"))?;

    let stdout = drain(
        child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("{program} stdout not captured"))?,
    );
    let stderr = drain(
        child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("{program} stderr not captured"))?,
    );

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait().with_context(|| format!("Failed to wait for {program}"))? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            bail!("{program} {args:?} timed out after {timeout:?}");
        }
        thread::sleep(Duration::from_millis(hyprctl::POLL_INTERVAL_MS));
    };

    let output = collect(stdout, "stdout")?;
    let errors = collect(stderr, "stderr")?;

    if !status.success() {
        bail!("{program} {args:?} failed ({status}): {}", errors.trim());
    }

    Ok(output)
}

fn run_json<T: for<'de> Deserialize<'de>>(args: &[&str]) -> Result<T> {
    let output = run(args)?;
    serde_json::from_str(&output).with_context(|| format!("Failed to parse JSON from hyprctl {args:?}"))
}

/// Subset of `hyprctl monitors -j` we care about
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HyprMonitor {
    name: String,
    #[serde(default)]
    description: String,
    width: u32,
    height: u32,
    refresh_rate: f32,
    x: i32,
    y: i32,
    scale: f32,
    #[serde(default)]
    transform: u8,
    #[serde(default)]
    vrr: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    current_format: String,
    #[serde(default)]
    mirror_of: String,
    #[serde(default)]
    available_modes: Vec<String>,
}

impl From<HyprMonitor> for Monitor {
    fn from(hm: HyprMonitor) -> Self {
        let modes = hm
            .available_modes
            .iter()
            .filter_map(|raw| match raw.parse::<Mode>() {
                Ok(mode) => Some(mode),
                Err(e) => {
                    debug!(monitor = %hm.name, mode = %raw, error = %e, "Skipping unparsable mode");
                    None
                }
            })
            .collect();

        let mirror_source = match hm.mirror_of.as_str() {
            "" | hyprctl::NO_MIRROR => None,
            source => Some(source.to_string()),
        };

        let transform = Transform::try_from(hm.transform).unwrap_or_else(|e| {
            warn!(monitor = %hm.name, error = %e, "Unknown transform, treating as normal");
            Transform::Normal
        });

        let mut monitor = Monitor::new(hm.name, hm.width, hm.height, hm.refresh_rate)
            .at(hm.x, hm.y)
            .with_scale(hm.scale)
            .with_transform(transform);
        monitor.description = hm.description;
        monitor.active = !hm.disabled;
        monitor.mirror_source = mirror_source;
        monitor.modes = modes;
        monitor.vrr = if hm.vrr { Vrr::On } else { Vrr::Off };
        if hm.current_format.contains("2101010") {
            monitor.bit_depth = 10;
        }
        monitor
    }
}

pub fn parse_monitors(json: &str) -> Result<Vec<Monitor>> {
    let raw: Vec<HyprMonitor> = serde_json::from_str(json).context("Failed to parse monitor list")?;
    Ok(raw.into_iter().map(Monitor::from).collect())
}

/// All monitors, including disabled ones
pub fn read_monitors() -> Result<Vec<Monitor>> {
    let raw: Vec<HyprMonitor> = run_json(&["monitors", "all", "-j"])?;
    let monitors: Vec<Monitor> = raw.into_iter().map(Monitor::from).collect();
    info!(count = monitors.len(), "Read monitors from compositor");
    Ok(monitors)
}

/// Names of the currently enabled monitors
pub fn enabled_monitor_names() -> Result<Vec<String>> {
    let raw: Vec<HyprMonitor> = run_json(&["monitors", "-j"])?;
    Ok(raw.into_iter().filter(|m| !m.disabled).map(|m| m.name).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub monitor: String,
}

pub fn read_workspaces() -> Result<Vec<Workspace>> {
    run_json(&["workspaces", "-j"])
}

/// Send one monitor rule to the compositor
pub fn apply_monitor(monitor: &Monitor) -> Result<()> {
    let rule = monitor_rule(monitor)?;
    let output = run(&["keyword", "monitor", &rule])?;
    let reply = output.trim();
    if !reply.is_empty() && reply != "ok" {
        bail!("hyprctl rejected monitor rule '{rule}': {reply}");
    }
    debug!(monitor = %monitor.name, rule = %rule, "Applied monitor rule");
    Ok(())
}

/// Apply every monitor in order, stopping at the first failure
pub fn apply_monitors(monitors: &[Monitor]) -> Result<()> {
    for monitor in monitors {
        apply_monitor(monitor).with_context(|| format!("Failed to apply monitor {}", monitor.name))?;
    }
    info!(count = monitors.len(), "Applied monitor configuration");
    Ok(())
}

/// Ask Hyprland to re-read its config file
pub fn reload() -> Result<()> {
    run(&["reload"]).map(|_| ()).context("Failed to reload Hyprland config")
}

/// Names present before but not after
pub fn find_removed_monitors(previous: &[String], current: &[String]) -> Vec<String> {
    let current: HashSet<&str> = current.iter().map(String::as_str).collect();
    previous
        .iter()
        .filter(|name| !current.contains(name.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceMove {
    pub workspace: i64,
    /// Monitor name, or `current` for the focused monitor
    pub target: String,
}

/// Workspace moves needed after the enabled monitor set changed
///
/// With a single enabled monitor every workspace goes there. Otherwise only
/// workspaces left on removed monitors move to the focused one.
pub fn plan_workspace_migration(
    previous: &[String],
    current: &[String],
    workspaces: &[Workspace],
) -> Vec<WorkspaceMove> {
    if let [only] = current {
        return workspaces
            .iter()
            .filter(|ws| ws.monitor != *only)
            .map(|ws| WorkspaceMove {
                workspace: ws.id,
                target: only.clone(),
            })
            .collect();
    }

    let removed = find_removed_monitors(previous, current);
    workspaces
        .iter()
        .filter(|ws| removed.contains(&ws.monitor))
        .map(|ws| WorkspaceMove {
            workspace: ws.id,
            target: "current".to_string(),
        })
        .collect()
}

/// Move workspaces off monitors that disappeared
pub fn migrate_orphaned_workspaces(previous: &[String]) -> Result<()> {
    let current = enabled_monitor_names()?;
    let removed = find_removed_monitors(previous, &current);
    if current.len() != 1 && removed.is_empty() {
        return Ok(());
    }

    let workspaces = read_workspaces().context("Failed to read workspaces")?;
    for step in plan_workspace_migration(previous, &current, &workspaces) {
        let id = step.workspace.to_string();
        run(&["dispatch", "moveworkspacetomonitor", &id, &step.target])
            .with_context(|| format!("Failed to migrate workspace {} to {}", step.workspace, step.target))?;
        info!(workspace = step.workspace, target = %step.target, "Migrated workspace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITORS_JSON: &str = r#"[
        {
            "id": 0, "name": "eDP-1", "description": "BOE 0x095F",
            "width": 2256, "height": 1504, "refreshRate": 59.99900,
            "x": 0, "y": 0, "scale": 1.50, "transform": 0,
            "vrr": false, "disabled": false, "currentFormat": "XRGB8888",
            "mirrorOf": "none",
            "availableModes": ["2256x1504@60.00Hz", "2256x1504@48.00Hz", "garbage"]
        },
        {
            "id": 1, "name": "DP-3", "description": "Dell U2720Q",
            "width": 3840, "height": 2160, "refreshRate": 60.0,
            "x": 1504, "y": -200, "scale": 2.0, "transform": 1,
            "vrr": true, "disabled": true, "currentFormat": "XRGB2101010",
            "mirrorOf": "eDP-1", "availableModes": []
        }
    ]"#;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn workspace(id: i64, monitor: &str) -> Workspace {
        Workspace {
            id,
            name: id.to_string(),
            monitor: monitor.to_string(),
        }
    }

    #[test]
    fn test_parse_monitors() {
        let monitors = parse_monitors(MONITORS_JSON).unwrap();
        assert_eq!(monitors.len(), 2);

        let laptop = &monitors[0];
        assert_eq!(laptop.name, "eDP-1");
        assert_eq!(laptop.description, "BOE 0x095F");
        assert_eq!((laptop.width, laptop.height), (2256, 1504));
        assert_eq!(laptop.scale, 1.5);
        assert!(laptop.active);
        assert_eq!(laptop.mirror_source, None);
        assert_eq!(laptop.modes.len(), 2);
        assert_eq!(laptop.bit_depth, 8);
    }

    #[test]
    fn test_parse_monitor_flags() {
        let monitors = parse_monitors(MONITORS_JSON).unwrap();
        let external = &monitors[1];
        assert!(!external.active);
        assert_eq!((external.x, external.y), (1504, -200));
        assert_eq!(external.transform, Transform::Rotate90);
        assert_eq!(external.vrr, Vrr::On);
        assert_eq!(external.bit_depth, 10);
        assert_eq!(external.mirror_source.as_deref(), Some("eDP-1"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_monitors("not json").is_err());
    }

    #[test]
    fn test_find_removed_monitors() {
        let removed = find_removed_monitors(&names(&["eDP-1", "DP-1", "DP-2"]), &names(&["eDP-1"]));
        assert_eq!(removed, names(&["DP-1", "DP-2"]));
        assert!(find_removed_monitors(&names(&["A"]), &names(&["A", "B"])).is_empty());
    }

    #[test]
    fn test_migration_single_monitor_collects_everything() {
        let workspaces = vec![workspace(1, "eDP-1"), workspace(2, "DP-1"), workspace(3, "DP-2")];
        let plan = plan_workspace_migration(&names(&["eDP-1", "DP-1"]), &names(&["eDP-1"]), &workspaces);
        assert_eq!(
            plan,
            vec![
                WorkspaceMove { workspace: 2, target: "eDP-1".to_string() },
                WorkspaceMove { workspace: 3, target: "eDP-1".to_string() },
            ]
        );
    }

    #[test]
    fn test_migration_multi_monitor_moves_orphans_only() {
        let workspaces = vec![workspace(1, "eDP-1"), workspace(2, "DP-1"), workspace(3, "DP-2")];
        let plan = plan_workspace_migration(
            &names(&["eDP-1", "DP-1", "DP-2"]),
            &names(&["eDP-1", "DP-2"]),
            &workspaces,
        );
        assert_eq!(plan, vec![WorkspaceMove { workspace: 2, target: "current".to_string() }]);
    }

    #[test]
    fn test_migration_nothing_removed() {
        let workspaces = vec![workspace(1, "eDP-1"), workspace(2, "DP-1")];
        let plan = plan_workspace_migration(&names(&["eDP-1", "DP-1"]), &names(&["eDP-1", "DP-1"]), &workspaces);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_run_command_survives_large_stderr() {
        let started = Instant::now();
        let output = run_command(
            "sh",
            &["-c", "head -c 262144 /dev/zero >&2; echo ok"],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(output.trim(), "ok");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_run_command_reports_stderr_on_failure() {
        let err = run_command("sh", &["-c", "echo bad rule >&2; exit 3"], Duration::from_secs(5)).unwrap_err();
        assert!(format!("{err:#}").contains("bad rule"));
    }

    #[test]
    fn test_run_command_times_out() {
        let err = run_command("sh", &["-c", "sleep 5"], Duration::from_millis(200)).unwrap_err();
        assert!(format!("{err:#}").contains("timed out"));
    }
}
