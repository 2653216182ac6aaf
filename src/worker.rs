//! Background jobs for compositor and filesystem I/O
//!
//! Each job runs on its own short-lived thread and reports a single
//! [`WorkerEvent`] back to the UI loop. The UI thread never blocks on
//! hyprctl or disk writes.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::config::ProfileStore;
use crate::hypr_config;
use crate::hyprctl;
use crate::types::Monitor;

#[derive(Debug, Clone)]
pub enum Job {
    LoadMonitors,
    /// Send the layout to the compositor, then move orphaned workspaces
    Apply {
        monitors: Vec<Monitor>,
        previous_names: Vec<String>,
    },
    /// Rewrite the Hyprland config and reload it
    WriteConfig(Vec<Monitor>),
    /// Re-apply the rollback snapshot
    Revert(Vec<Monitor>),
    SaveProfile {
        store: ProfileStore,
        name: String,
        monitors: Vec<Monitor>,
    },
}

impl Job {
    fn label(&self) -> &'static str {
        match self {
            Job::LoadMonitors => "load_monitors",
            Job::Apply { .. } => "apply",
            Job::WriteConfig(_) => "write_config",
            Job::Revert(_) => "revert",
            Job::SaveProfile { .. } => "save_profile",
        }
    }
}

#[derive(Debug)]
pub enum WorkerEvent {
    MonitorsLoaded(Result<Vec<Monitor>>),
    /// Carries the layout that was sent so the session can track rollback
    Applied {
        monitors: Vec<Monitor>,
        result: Result<()>,
    },
    /// Backup path on success
    Saved(Result<PathBuf>),
    Reverted(Result<()>),
    ProfileSaved { name: String, result: Result<()> },
}

/// Run `job` on a worker thread; the result arrives on `sender`
pub fn spawn(job: Job, sender: Sender<WorkerEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let label = job.label();
        debug!(job = label, "Worker started");
        let event = run(job);
        if sender.send(event).is_err() {
            warn!(job = label, "UI loop gone before worker finished");
        }
    })
}

/// Execute a job synchronously
pub fn run(job: Job) -> WorkerEvent {
    match job {
        Job::LoadMonitors => WorkerEvent::MonitorsLoaded(hyprctl::read_monitors()),
        Job::Apply {
            monitors,
            previous_names,
        } => {
            let result = hyprctl::apply_monitors(&monitors);
            match &result {
                Ok(()) => {
                    if let Err(e) = hyprctl::migrate_orphaned_workspaces(&previous_names) {
                        warn!(error = %format!("{e:#}"), "Workspace migration failed");
                    }
                }
                Err(e) => error!(error = %format!("{e:#}"), "Apply failed"),
            }
            WorkerEvent::Applied { monitors, result }
        }
        Job::WriteConfig(monitors) => WorkerEvent::Saved(write_and_reload(&monitors)),
        Job::Revert(monitors) => {
            let result = hyprctl::apply_monitors(&monitors);
            if result.is_ok() {
                info!(count = monitors.len(), "Reverted to previous configuration");
            }
            WorkerEvent::Reverted(result)
        }
        Job::SaveProfile { store, name, monitors } => {
            let result = store.save(&name, &monitors);
            WorkerEvent::ProfileSaved { name, result }
        }
    }
}

fn write_and_reload(monitors: &[Monitor]) -> Result<PathBuf> {
    let path = hypr_config::config_path()?;
    let backup = hypr_config::write_config(&path, monitors)?;
    hyprctl::reload()?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn test_save_profile_job_reports_back() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        let (tx, rx) = mpsc::channel();

        let handle = spawn(
            Job::SaveProfile {
                store: store.clone(),
                name: "desk".to_string(),
                monitors: vec![Monitor::new("DP-1", 1920, 1080, 60.0)],
            },
            tx,
        );
        handle.join().unwrap();

        match rx.recv().unwrap() {
            WorkerEvent::ProfileSaved { name, result } => {
                assert_eq!(name, "desk");
                assert!(result.is_ok());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(store.exists("desk"));
    }

    #[test]
    fn test_invalid_profile_name_fails_in_worker() {
        let dir = TempDir::new().unwrap();
        let event = run(Job::SaveProfile {
            store: ProfileStore::new(dir.path()),
            name: "../escape".to_string(),
            monitors: Vec::new(),
        });
        assert!(matches!(event, WorkerEvent::ProfileSaved { result: Err(_), .. }));
    }
}
