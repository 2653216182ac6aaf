//! Terminal and worker event routing for the layout editor
//!
//! An open overlay owns the keyboard; otherwise keys and mouse events map
//! onto `Session` methods. Anything needing I/O comes back as
//! [`Action::Run`] for the app loop to hand to the worker.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, info, warn};

use crate::config::ProfileStore;
use crate::constants::{editing, layout};
use crate::session::{Overlay, Session};
use crate::ui::components::help::visible_rows;
use crate::ui::components::PickerOutcome;
use crate::worker::{Job, WorkerEvent};

#[derive(Debug)]
pub enum Action {
    None,
    Quit,
    OpenProfiles,
    Run(Job),
}

pub fn handle_event(session: &mut Session, event: Event, store: &ProfileStore) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match route_overlay_key(session, key, store) {
            Some(action) => action,
            None => handle_key(session, key),
        },
        Event::Mouse(mouse) => {
            handle_mouse(session, mouse);
            Action::None
        }
        Event::Resize(columns, rows) => {
            debug!(columns, rows, "Terminal resized");
            session.resize(columns, rows);
            Action::None
        }
        _ => Action::None,
    }
}

/// Feed a key to the open overlay; `None` when no overlay is open
fn route_overlay_key(session: &mut Session, key: KeyEvent, store: &ProfileStore) -> Option<Action> {
    match std::mem::take(&mut session.overlay) {
        Overlay::None => return None,
        Overlay::Help(mut help) => {
            if help.handle_key(key, visible_rows(session.world.term_height)) == PickerOutcome::Pending {
                session.overlay = Overlay::Help(help);
            }
        }
        Overlay::ScalePicker(mut picker) => match picker.handle_key(key) {
            PickerOutcome::Pending => session.overlay = Overlay::ScalePicker(picker),
            PickerOutcome::Selected(scale) => session.set_scale(scale),
            PickerOutcome::Cancelled => session.close_overlay("Scale selection cancelled"),
        },
        Overlay::ModePicker(mut picker) => match picker.handle_key(key) {
            PickerOutcome::Pending => session.overlay = Overlay::ModePicker(picker),
            PickerOutcome::Selected(mode) => session.set_mode(mode),
            PickerOutcome::Cancelled => session.close_overlay("Mode selection cancelled"),
        },
        Overlay::MirrorPicker(mut picker) => match picker.handle_key(key) {
            PickerOutcome::Pending => session.overlay = Overlay::MirrorPicker(picker),
            PickerOutcome::Selected(source) => session.set_mirror(source),
            PickerOutcome::Cancelled => session.close_overlay("Mirror selection cancelled"),
        },
        Overlay::AdvancedSettings(mut dialog) => match dialog.handle_key(key) {
            PickerOutcome::Pending => session.overlay = Overlay::AdvancedSettings(dialog),
            PickerOutcome::Selected(values) => session.set_advanced(values),
            PickerOutcome::Cancelled => session.close_overlay("Advanced settings discarded"),
        },
        Overlay::ProfileInput(mut input) => match input.handle_key(key) {
            PickerOutcome::Pending => session.overlay = Overlay::ProfileInput(input),
            PickerOutcome::Selected(name) => {
                session.status = format!("Saving profile '{name}'...");
                return Some(Action::Run(Job::SaveProfile {
                    store: store.clone(),
                    name,
                    monitors: session.snapshot(),
                }));
            }
            PickerOutcome::Cancelled => session.close_overlay("Profile save cancelled"),
        },
    }
    Some(Action::None)
}

fn handle_key(session: &mut Session, key: KeyEvent) -> Action {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Char('q' | 'Q') => return Action::Quit,
        KeyCode::Char('?') => session.open_help(),
        KeyCode::Tab => session.select_next(),
        KeyCode::BackTab => session.select_prev(),

        KeyCode::Up | KeyCode::Char('k') => session.nudge(0, -1, shift),
        KeyCode::Down | KeyCode::Char('j') => session.nudge(0, 1, shift),
        KeyCode::Left | KeyCode::Char('h') => session.nudge(-1, 0, shift),
        KeyCode::Right | KeyCode::Char('l') => session.nudge(1, 0, shift),
        KeyCode::Char('K') => session.nudge(0, -1, true),
        KeyCode::Char('J') => session.nudge(0, 1, true),
        KeyCode::Char('H') => session.nudge(-1, 0, true),

        KeyCode::Enter | KeyCode::Char(' ') => session.toggle_selected(),
        KeyCode::Char('g' | 'G') => session.cycle_grid(),
        KeyCode::Char('L') => session.cycle_snap(),
        KeyCode::Char('r' | 'R') => session.open_scale_picker(),
        KeyCode::Char('f' | 'F') => session.open_mode_picker(),
        KeyCode::Char('m' | 'M') => session.open_mirror_picker(),
        KeyCode::Char('c' | 'C' | 'd' | 'D') => session.open_advanced_settings(),
        KeyCode::Char('p' | 'P') => session.open_profile_input(),
        KeyCode::Char('o' | 'O') => return Action::OpenProfiles,

        KeyCode::Char('a' | 'A') => {
            session.status = "Applying configuration...".to_string();
            return Action::Run(Job::Apply {
                monitors: session.snapshot(),
                previous_names: session.previous_monitor_names.clone(),
            });
        }
        KeyCode::Char('s' | 'S') => {
            session.status = "Saving configuration...".to_string();
            return Action::Run(Job::WriteConfig(session.snapshot()));
        }
        KeyCode::Char('z' | 'Z') => match &session.rollback {
            Some(previous) => {
                session.status = "Reverting...".to_string();
                return Action::Run(Job::Revert(previous.clone()));
            }
            None => session.status = "No previous configuration to revert to".to_string(),
        },
        _ => {}
    }
    Action::None
}

/// Terminal cell to canvas cell
fn canvas_cell(mouse: &MouseEvent) -> (i32, i32) {
    (
        i32::from(mouse.column) - i32::from(layout::CANVAS_ORIGIN_COL),
        i32::from(mouse.row) - i32::from(layout::CANVAS_ORIGIN_ROW),
    )
}

fn handle_mouse(session: &mut Session, mouse: MouseEvent) {
    if let Overlay::Help(help) = &mut session.overlay {
        match mouse.kind {
            MouseEventKind::ScrollUp => help.scroll_up(),
            MouseEventKind::ScrollDown => help.scroll_down(visible_rows(session.world.term_height)),
            MouseEventKind::Down(_) => session.overlay = Overlay::None,
            _ => {}
        }
        return;
    }
    if !matches!(session.overlay, Overlay::None) {
        return;
    }

    let (col, row) = canvas_cell(&mouse);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            session.begin_drag(col, row);
        }
        MouseEventKind::Drag(MouseButton::Left) => session.drag_to(col, row),
        MouseEventKind::Up(MouseButton::Left) => session.end_drag(),
        MouseEventKind::Down(MouseButton::Right) => session.toggle_at(col, row),
        MouseEventKind::ScrollUp => session.adjust_scale(editing::WHEEL_SCALE_STEP),
        MouseEventKind::ScrollDown => session.adjust_scale(-editing::WHEEL_SCALE_STEP),
        _ => {}
    }
}

/// Fold a finished background job into the session
pub fn handle_worker_event(session: &mut Session, event: WorkerEvent) -> Action {
    match event {
        WorkerEvent::MonitorsLoaded(Ok(monitors)) => session.load_monitors(monitors),
        WorkerEvent::MonitorsLoaded(Err(e)) => {
            warn!(error = %format!("{e:#}"), "Failed to read monitors");
            session.status = format!("Failed to read monitors: {e:#}");
        }
        WorkerEvent::Applied { monitors, result: Ok(()) } => {
            session.mark_applied(monitors);
            session.status = "Configuration applied (z to revert)".to_string();
        }
        WorkerEvent::Applied { result: Err(e), .. } => {
            session.status = format!("Apply failed: {e:#}");
        }
        WorkerEvent::Saved(Ok(backup)) => {
            session.status = format!("Configuration saved (backup: {})", backup.display());
        }
        WorkerEvent::Saved(Err(e)) => {
            warn!(error = %format!("{e:#}"), "Failed to save configuration");
            session.status = format!("Save failed: {e:#}");
        }
        WorkerEvent::Reverted(Ok(())) => {
            session.mark_reverted();
            session.status = "Reverted to previous configuration".to_string();
            return Action::Run(Job::LoadMonitors);
        }
        WorkerEvent::Reverted(Err(e)) => {
            session.status = format!("Revert failed: {e:#}");
        }
        WorkerEvent::ProfileSaved { name, result: Ok(()) } => {
            info!(profile = %name, "Profile saved from editor");
            if !session.profile_names.contains(&name) {
                session.profile_names.push(name.clone());
            }
            session.status = format!("Profile '{name}' saved");
            session.profile_name = Some(name);
            session.overlay = Overlay::None;
        }
        WorkerEvent::ProfileSaved { name, result: Err(e) } => {
            session.status = format!("Failed to save profile '{name}': {e:#}");
        }
    }
    Action::None
}
