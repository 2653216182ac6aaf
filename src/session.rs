//! Editor state: the monitor list being arranged plus everything the UI needs
//!
//! All monitor mutations go through `Session` methods keyed by the selected
//! index. The session never touches the compositor or the filesystem; the
//! event handler turns user intent into worker jobs.

use tracing::{debug, info};

use crate::config::Settings;
use crate::constants::editing;
use crate::mirror;
use crate::snapping::{snap_position, Guide, SnapMode};
use crate::types::{DragState, Mode, Monitor};
use crate::ui::components::advanced_settings::{AdvancedSettingsState, AdvancedValues};
use crate::ui::components::help::HelpState;
use crate::ui::components::mirror_picker::MirrorPickerState;
use crate::ui::components::mode_picker::ModePickerState;
use crate::ui::components::profile_input::ProfileInputState;
use crate::ui::components::scale_picker::ScalePickerState;
use crate::viewport::{hit_test, World};

/// Modal dialog currently owning keyboard input
#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    Help(HelpState),
    ScalePicker(ScalePickerState),
    ModePicker(ModePickerState),
    MirrorPicker(MirrorPickerState),
    AdvancedSettings(AdvancedSettingsState),
    ProfileInput(ProfileInputState),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub monitors: Vec<Monitor>,
    pub selected: Option<usize>,
    pub grid_px: i32,
    pub snap_mode: SnapMode,
    pub snap_threshold: i32,
    pub world: World,
    pub guides: Vec<Guide>,
    pub status: String,
    pub profile_name: Option<String>,
    pub overlay: Overlay,
    /// Known profile names, refreshed by the app loop
    pub profile_names: Vec<String>,
    /// Compositor state before the last successful apply
    pub rollback: Option<Vec<Monitor>>,
    /// Last state known to be live in the compositor
    live: Vec<Monitor>,
    /// Enabled monitor names at load time, used for workspace migration
    pub previous_monitor_names: Vec<String>,
}

impl Session {
    pub fn new(settings: &Settings, term_width: u16, term_height: u16) -> Self {
        let mut world = World::default();
        world.set_terminal_size(term_width, term_height);

        Self {
            monitors: Vec::new(),
            selected: None,
            grid_px: settings.grid_px,
            snap_mode: settings.snap_mode,
            snap_threshold: settings.snap_threshold,
            world,
            guides: Vec::new(),
            status: "Loading monitors...".to_string(),
            profile_name: None,
            overlay: Overlay::None,
            profile_names: Vec::new(),
            rollback: None,
            live: Vec::new(),
            previous_monitor_names: Vec::new(),
        }
    }

    /// Replace the monitor list with a fresh compositor snapshot
    pub fn load_monitors(&mut self, monitors: Vec<Monitor>) {
        self.selected = if monitors.is_empty() { None } else { Some(0) };
        self.previous_monitor_names = monitors
            .iter()
            .filter(|m| m.active)
            .map(|m| m.name.clone())
            .collect();
        self.live = monitors.clone();
        self.monitors = monitors;
        self.guides.clear();
        self.world.recompute(&self.monitors);
        self.status = format!("Loaded {} monitors", self.monitors.len());
        info!(count = self.monitors.len(), "Session loaded monitors");
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.world.set_terminal_size(columns, rows);
    }

    pub fn selected_monitor(&self) -> Option<&Monitor> {
        self.selected.and_then(|i| self.monitors.get(i))
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected.filter(|&i| i < self.monitors.len())
    }

    pub fn select_next(&mut self) {
        let len = self.monitors.len();
        if len > 0 {
            self.selected = Some(self.selected.map_or(0, |i| (i + 1) % len));
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.monitors.len();
        if len > 0 {
            self.selected = Some(self.selected.map_or(0, |i| (i + len - 1) % len));
        }
    }

    /// Pick the monitor under a canvas cell and start dragging it
    pub fn begin_drag(&mut self, col: i32, row: i32) -> bool {
        let Some(hit) = hit_test(&self.world, &self.monitors, col, row) else {
            return false;
        };
        let (wx, wy) = self.world.term_to_world(col, row);
        self.selected = Some(hit);
        let mon = &mut self.monitors[hit];
        mon.drag = Some(DragState {
            offset_x: wx - mon.x,
            offset_y: wy - mon.y,
        });
        debug!(monitor = %mon.name, col, row, "Drag started");
        true
    }

    /// Move the dragged monitor so the grab point follows the pointer
    pub fn drag_to(&mut self, col: i32, row: i32) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let Some(drag) = self.monitors[idx].drag else {
            return;
        };

        let (wx, wy) = self.world.term_to_world(col, row);
        let mut x = wx - drag.offset_x;
        let mut y = wy - drag.offset_y;

        if self.grid_px > 1 {
            x = (x / self.grid_px) * self.grid_px;
            y = (y / self.grid_px) * self.grid_px;
        }

        self.place(idx, x, y);
    }

    pub fn end_drag(&mut self) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        if self.monitors[idx].drag.take().is_some() {
            self.guides.clear();
            self.world.recompute(&self.monitors);
            let mon = &self.monitors[idx];
            debug!(monitor = %mon.name, x = mon.x, y = mon.y, "Drag finished");
        }
    }

    /// Move the selected monitor by whole grid steps
    pub fn nudge(&mut self, dx: i32, dy: i32, large: bool) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let step = if large {
            self.grid_px * editing::LARGE_STEP_MULTIPLIER
        } else {
            self.grid_px
        };
        let x = self.monitors[idx].x + dx * step;
        let y = self.monitors[idx].y + dy * step;
        self.place(idx, x, y);
        self.world.recompute(&self.monitors);
    }

    fn place(&mut self, idx: usize, x: i32, y: i32) {
        let (x, y) = if self.snap_mode == SnapMode::Off {
            self.guides.clear();
            (x, y)
        } else {
            let snapped = snap_position(&self.monitors, idx, x, y, self.snap_mode, self.snap_threshold);
            self.guides = snapped.guides;
            (snapped.x, snapped.y)
        };
        let mon = &mut self.monitors[idx];
        mon.x = x;
        mon.y = y;
    }

    pub fn active_count(&self) -> usize {
        self.monitors.iter().filter(|m| m.active).count()
    }

    /// Enabling is always allowed; disabling needs another active monitor
    pub fn can_toggle(&self, index: usize) -> bool {
        match self.monitors.get(index) {
            Some(mon) if mon.active => self.active_count() > 1,
            Some(_) => true,
            None => false,
        }
    }

    pub fn toggle_active(&mut self, index: usize) {
        if index >= self.monitors.len() {
            return;
        }
        if !self.can_toggle(index) {
            self.status = "Cannot disable the last active monitor".to_string();
            return;
        }
        let mon = &mut self.monitors[index];
        mon.active = !mon.active;
        self.status = format!(
            "Monitor {}: {}",
            mon.name,
            if mon.active { "Active" } else { "Inactive" }
        );
    }

    pub fn toggle_selected(&mut self) {
        if let Some(idx) = self.selected_index() {
            self.toggle_active(idx);
        }
    }

    /// Right-click: toggle whatever is under the cell without selecting it
    pub fn toggle_at(&mut self, col: i32, row: i32) {
        if let Some(hit) = hit_test(&self.world, &self.monitors, col, row) {
            self.toggle_active(hit);
        }
    }

    pub fn cycle_grid(&mut self) {
        let idx = editing::GRID_SIZES
            .iter()
            .position(|&g| g == self.grid_px)
            .unwrap_or(0);
        self.grid_px = editing::GRID_SIZES[(idx + 1) % editing::GRID_SIZES.len()];
        self.status = format!("Grid: {} px", self.grid_px);
    }

    pub fn cycle_snap(&mut self) {
        self.snap_mode = self.snap_mode.next();
        if self.snap_mode == SnapMode::Off {
            self.guides.clear();
        }
        self.status = format!("Snap: {}", self.snap_mode.label());
    }

    /// Mouse-wheel scale change, clamped to the supported range
    pub fn adjust_scale(&mut self, delta: f32) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let mon = &mut self.monitors[idx];
        mon.scale = (mon.scale + delta).clamp(editing::MIN_SCALE, editing::MAX_SCALE);
        self.status = format!("Scale: {:.2}", mon.scale);
        self.world.recompute(&self.monitors);
    }

    pub fn set_scale(&mut self, scale: f32) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        self.monitors[idx].scale = scale;
        self.status = format!("Scale set to {scale:.2}x");
        self.world.recompute(&self.monitors);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let mon = &mut self.monitors[idx];
        mon.width = mode.width;
        mon.height = mode.height;
        mon.refresh_rate = mode.refresh_rate;
        self.status = format!("Mode set to {mode}");
        self.world.recompute(&self.monitors);
    }

    /// Point the selected monitor at a mirror source (`None` stops mirroring)
    pub fn set_mirror(&mut self, source: Option<String>) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let name = self.monitors[idx].name.clone();
        if let Some(src) = &source
            && mirror::would_create_cycle(&name, src, &self.monitors)
        {
            self.status = format!("Cannot mirror {name} to {src}: circular mirroring");
            return;
        }

        self.status = match &source {
            Some(src) => format!("Mirroring {name} to {src}"),
            None => format!("Mirroring disabled for {name}"),
        };
        self.monitors[idx].mirror_source = source;

        if let Some(warning) = mirror::validate(&self.monitors).into_iter().next() {
            self.status.push_str(" | Warnings: ");
            self.status.push_str(&warning);
        }
    }

    pub fn set_advanced(&mut self, values: AdvancedValues) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        values.apply_to(&mut self.monitors[idx]);
        self.status = "Advanced settings applied".to_string();
        self.world.recompute(&self.monitors);
    }

    pub fn open_help(&mut self) {
        self.overlay = Overlay::Help(HelpState::default());
    }

    pub fn open_scale_picker(&mut self) {
        if let Some(mon) = self.selected_monitor() {
            self.overlay = Overlay::ScalePicker(ScalePickerState::new(mon));
        }
    }

    pub fn open_mode_picker(&mut self) {
        let Some(mon) = self.selected_monitor() else {
            return;
        };
        if mon.modes.is_empty() {
            self.status = format!("No modes reported for {}", mon.name);
            return;
        }
        self.overlay = Overlay::ModePicker(ModePickerState::new(mon));
    }

    pub fn open_mirror_picker(&mut self) {
        if let Some(mon) = self.selected_monitor() {
            self.overlay = Overlay::MirrorPicker(MirrorPickerState::new(mon, &self.monitors));
        }
    }

    pub fn open_advanced_settings(&mut self) {
        if let Some(mon) = self.selected_monitor() {
            self.overlay = Overlay::AdvancedSettings(AdvancedSettingsState::new(mon));
        }
    }

    pub fn open_profile_input(&mut self) {
        self.overlay = Overlay::ProfileInput(ProfileInputState::new(self.profile_names.clone()));
    }

    pub fn close_overlay(&mut self, status: impl Into<String>) {
        self.overlay = Overlay::None;
        self.status = status.into();
    }

    /// Monitors to send to the compositor, without drag state
    pub fn snapshot(&self) -> Vec<Monitor> {
        self.monitors
            .iter()
            .cloned()
            .map(|mut m| {
                m.drag = None;
                m
            })
            .collect()
    }

    /// Record a successful apply: what was live becomes the rollback target
    pub fn mark_applied(&mut self, applied: Vec<Monitor>) {
        self.rollback = Some(std::mem::replace(&mut self.live, applied));
    }

    /// Record a successful revert: the rollback target is live again
    pub fn mark_reverted(&mut self) {
        if let Some(previous) = self.rollback.take() {
            self.live = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transform;

    fn session_with(monitors: Vec<Monitor>) -> Session {
        let mut session = Session::new(&Settings::default(), 80, 24);
        session.load_monitors(monitors);
        session
    }

    fn two_monitors() -> Vec<Monitor> {
        vec![
            Monitor::new("DP-1", 1920, 1080, 60.0),
            Monitor::new("HDMI-A-1", 1920, 1080, 60.0).at(1920, 0),
        ]
    }

    #[test]
    fn test_load_selects_first_and_sizes_world() {
        let session = session_with(two_monitors());
        assert_eq!(session.selected, Some(0));
        assert_eq!(session.world.width, 3840 + 500);
        assert_eq!(session.world.term_width, 80);
        assert_eq!(session.previous_monitor_names, vec!["DP-1", "HDMI-A-1"]);
        assert_eq!(session.status, "Loaded 2 monitors");
    }

    #[test]
    fn test_load_empty_has_no_selection() {
        let session = session_with(Vec::new());
        assert_eq!(session.selected, None);
        assert_eq!(session.world.width, 3840);
    }

    #[test]
    fn test_selection_wraps() {
        let mut session = session_with(two_monitors());
        session.select_next();
        assert_eq!(session.selected, Some(1));
        session.select_next();
        assert_eq!(session.selected, Some(0));
        session.select_prev();
        assert_eq!(session.selected, Some(1));
    }

    #[test]
    fn test_nudge_uses_grid_and_large_step() {
        let mut session = session_with(vec![Monitor::new("DP-1", 1920, 1080, 60.0).at(1000, 1000)]);
        session.snap_mode = SnapMode::Off;
        session.nudge(1, 0, false);
        assert_eq!(session.monitors[0].x, 1032);
        session.nudge(0, -1, true);
        assert_eq!(session.monitors[0].y, 1000 - 320);
    }

    #[test]
    fn test_nudge_snaps_to_neighbour() {
        let mut session = session_with(vec![
            Monitor::new("DP-1", 1920, 1080, 60.0).at(1000, 1000),
            Monitor::new("DP-2", 1920, 1080, 60.0).at(2928, 1000),
        ]);
        session.grid_px = 8;
        // 1000 + 1920 + 8 = 2928 lands exactly on the neighbour's left edge
        session.nudge(1, 0, false);
        assert_eq!(session.monitors[0].x, 1008);
        assert!(session.guides.contains(&Guide::Vertical(2928)));
    }

    #[test]
    fn test_drag_follows_grab_point_with_grid() {
        let mut session = session_with(vec![Monitor::new("DP-1", 1920, 1080, 60.0).at(64, 64)]);
        session.snap_mode = SnapMode::Off;
        session.grid_px = 64;

        assert!(session.begin_drag(5, 2));
        assert!(session.monitors[0].is_dragging());

        session.drag_to(20, 6);
        let mon = &session.monitors[0];
        assert_eq!(mon.x % 64, 0);
        assert_eq!(mon.y % 64, 0);
        assert!(mon.x > 64);

        session.end_drag();
        assert!(!session.monitors[0].is_dragging());
        assert!(session.guides.is_empty());
    }

    #[test]
    fn test_begin_drag_on_empty_space() {
        let mut session = session_with(two_monitors());
        assert!(!session.begin_drag(70, 12));
        assert_eq!(session.selected, Some(0));
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let mut session = session_with(two_monitors());
        session.drag_to(40, 5);
        assert_eq!(session.monitors[0].x, 0);
    }

    #[test]
    fn test_end_drag_recomputes_world() {
        let mut session = session_with(vec![Monitor::new("DP-1", 1920, 1080, 60.0)]);
        session.snap_mode = SnapMode::Off;
        session.grid_px = 1;
        assert!(session.begin_drag(0, 0));
        session.drag_to(30, 0);
        let moved_x = session.monitors[0].x;
        session.end_drag();
        assert_eq!(session.world.width, moved_x + 1920 + 500);
    }

    #[test]
    fn test_last_active_guard() {
        let mut session = session_with(two_monitors());
        session.toggle_active(0);
        assert!(!session.monitors[0].active);
        session.toggle_active(1);
        assert!(session.monitors[1].active);
        assert_eq!(session.status, "Cannot disable the last active monitor");

        // Re-enabling is always fine
        session.toggle_active(0);
        assert!(session.monitors[0].active);
    }

    #[test]
    fn test_cycle_grid_and_snap() {
        let mut session = session_with(two_monitors());
        assert_eq!(session.grid_px, 32);
        session.cycle_grid();
        assert_eq!(session.grid_px, 64);
        session.cycle_grid();
        assert_eq!(session.grid_px, 1);

        assert_eq!(session.snap_mode, SnapMode::Edges);
        session.cycle_snap();
        assert_eq!(session.snap_mode, SnapMode::Centers);
        assert_eq!(session.status, "Snap: Centers");
    }

    #[test]
    fn test_adjust_scale_clamps() {
        let mut session = session_with(two_monitors());
        for _ in 0..100 {
            session.adjust_scale(editing::WHEEL_SCALE_STEP);
        }
        assert_eq!(session.monitors[0].scale, editing::MAX_SCALE);
        for _ in 0..100 {
            session.adjust_scale(-editing::WHEEL_SCALE_STEP);
        }
        assert_eq!(session.monitors[0].scale, editing::MIN_SCALE);
    }

    #[test]
    fn test_set_mode_updates_world() {
        let mut session = session_with(vec![Monitor::new("DP-1", 1920, 1080, 60.0)]);
        session.set_mode(Mode::new(3840, 2160, 60.0));
        assert_eq!(session.monitors[0].width, 3840);
        assert_eq!(session.world.width, 3840 + 500);
    }

    #[test]
    fn test_set_mirror_reports_warnings_and_cycles() {
        let mut monitors = two_monitors();
        monitors[1].width = 2560;
        let mut session = session_with(monitors);

        session.set_mirror(Some("HDMI-A-1".to_string()));
        assert_eq!(session.monitors[0].mirror_source.as_deref(), Some("HDMI-A-1"));
        assert!(session.status.contains("Resolution mismatch"));

        session.select_next();
        session.set_mirror(Some("DP-1".to_string()));
        assert!(session.monitors[1].mirror_source.is_none());
        assert!(session.status.contains("circular"));

        session.select_prev();
        session.set_mirror(None);
        assert!(session.monitors[0].mirror_source.is_none());
    }

    #[test]
    fn test_rollback_tracks_previous_live_state() {
        let mut session = session_with(two_monitors());
        assert!(session.rollback.is_none());

        session.nudge(1, 0, true);
        let applied = session.snapshot();
        session.mark_applied(applied.clone());
        assert_eq!(session.rollback.as_deref(), Some(two_monitors().as_slice()));

        session.mark_reverted();
        assert!(session.rollback.is_none());
    }

    #[test]
    fn test_snapshot_strips_drag_state() {
        let mut session = session_with(two_monitors());
        assert!(session.begin_drag(2, 2));
        assert!(session.snapshot().iter().all(|m| m.drag.is_none()));
    }

    #[test]
    fn test_mode_picker_needs_modes() {
        let mut session = session_with(two_monitors());
        session.open_mode_picker();
        assert!(matches!(session.overlay, Overlay::None));

        session.monitors[0].modes = vec![Mode::new(1920, 1080, 60.0)];
        session.open_mode_picker();
        assert!(matches!(session.overlay, Overlay::ModePicker(_)));
    }

    #[test]
    fn test_rotated_monitor_hit_area() {
        let mut session = session_with(vec![
            Monitor::new("DP-1", 1920, 1080, 60.0)
                .at(2000, 0)
                .with_transform(Transform::Rotate90),
        ]);
        // World is 3580 wide over 77 columns; column 50 is x ~2325
        assert!(session.begin_drag(50, 5));
    }
}
