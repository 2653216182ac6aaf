#![forbid(unsafe_code)]

mod app;
mod config;
mod constants;
mod event_handler;
mod geometry;
mod hypr_config;
mod hyprctl;
mod mirror;
mod session;
mod snapping;
mod types;
mod ui;
mod viewport;
mod worker;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use app::{EditorExit, TerminalGuard};
use config::{ProfileStore, Settings};
use constants::config as config_consts;
use ui::profile_menu::MenuOutcome;

/// Interactive monitor layout editor for Hyprland
#[derive(Parser, Debug)]
#[command(name = "hyprmon", version, about, long_about = None, disable_version_flag = true)]
struct Cli {
    /// Apply a saved profile and exit
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Open the profile selection page
    #[arg(long)]
    profiles: bool,

    /// Print saved profile names, marking the active one with " *"
    #[arg(long)]
    list_profiles: bool,

    /// Print the profile matching the current layout
    #[arg(long)]
    active_profile: bool,

    /// Directory for settings and profiles (default: ~/.config/hyprmon)
    #[arg(long, value_name = "DIR")]
    cfg: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Same as --profiles
    Profiles,
}

impl Cli {
    fn wants_profile_menu(&self) -> bool {
        self.profiles || matches!(self.command, Some(Command::Profiles))
    }

    fn is_interactive(&self) -> bool {
        !self.list_profiles && !self.active_profile && self.profile.is_none()
    }
}

fn parse_level(value: &str) -> TraceLevel {
    match value.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

/// Interactive runs log to a file since the terminal belongs to the UI
fn init_logging(level: TraceLevel, interactive: bool) -> Result<()> {
    if !interactive {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    let path = config::log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Apply a stored profile to the compositor
fn apply_profile(store: &ProfileStore, name: &str) -> Result<()> {
    let profile = store.load(name)?;
    let previous = hyprctl::enabled_monitor_names().context("Failed to read current monitors")?;
    hyprctl::apply_monitors(&profile.monitors)?;
    if let Err(e) = hyprctl::migrate_orphaned_workspaces(&previous) {
        warn!(error = %format!("{e:#}"), "Workspace migration failed");
    }
    info!(profile = %name, monitors = profile.monitors.len(), "Profile applied");
    Ok(())
}

fn current_active_profile(store: &ProfileStore) -> Result<Option<String>> {
    let monitors = hyprctl::read_monitors()?;
    store.active_profile(&monitors)
}

fn list_profiles(store: &ProfileStore) -> Result<()> {
    let active = current_active_profile(store).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Could not determine active profile");
        None
    });
    for name in store.ordered_list()? {
        if active.as_deref() == Some(name.as_str()) {
            println!("{name} *");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

/// Alternate between the editor and the profile page until the user quits
///
/// Returns a profile chosen on the profile page, applied after the terminal
/// is restored.
fn run_interactive(settings: &Settings, store: &ProfileStore, start_in_menu: bool) -> Result<Option<String>> {
    let mut guard = TerminalGuard::enter()?;
    let mut in_menu = start_in_menu;
    let mut profile_name = None;

    loop {
        if in_menu {
            let active = current_active_profile(store).unwrap_or_else(|e| {
                warn!(error = %format!("{e:#}"), "Could not determine active profile");
                None
            });
            match app::run_profile_menu(&mut guard.terminal, store, active.clone())? {
                MenuOutcome::Quit | MenuOutcome::Continue => return Ok(None),
                MenuOutcome::Apply(name) => return Ok(Some(name)),
                MenuOutcome::OpenEditor => {
                    profile_name = active;
                    in_menu = false;
                }
            }
        } else {
            match app::run_editor(&mut guard.terminal, settings, store, profile_name.take())? {
                EditorExit::Quit => return Ok(None),
                EditorExit::OpenProfiles => in_menu = true,
            }
        }
    }
}

fn run(cli: Cli, config_root: &Path, settings: &Settings) -> Result<(), (&'static str, anyhow::Error)> {
    let store = ProfileStore::in_config_root(config_root);

    if cli.active_profile {
        match current_active_profile(&store).map_err(|e| ("getting active profile", e))? {
            Some(name) => println!("{name}"),
            None => println!("No active profile found"),
        }
        return Ok(());
    }

    if cli.list_profiles {
        return list_profiles(&store).map_err(|e| ("listing profiles", e));
    }

    if let Some(name) = &cli.profile {
        apply_profile(&store, name).map_err(|e| ("applying profile", e))?;
        println!("Profile '{name}' applied successfully");
        return Ok(());
    }

    let chosen = run_interactive(settings, &store, cli.wants_profile_menu()).map_err(|e| ("running interface", e))?;
    if let Some(name) = chosen {
        apply_profile(&store, &name).map_err(|e| ("applying profile", e))?;
        println!("Profile '{name}' applied successfully");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_root = match config::config_root(cli.cfg.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error resolving config directory: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let settings = match Settings::load(&config_root) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let level = parse_level(
        &std::env::var(config_consts::LOG_LEVEL_ENV).unwrap_or_else(|_| settings.log_level.clone()),
    );
    if let Err(e) = init_logging(level, cli.is_interactive()) {
        eprintln!("Error initializing logging: {e:#}");
        return ExitCode::FAILURE;
    }
    info!(config_root = %config_root.display(), "hyprmon v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli, &config_root, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err((doing, e)) => {
            error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("Error {doing}: {e:#}");
            ExitCode::FAILURE
        }
    }
}
