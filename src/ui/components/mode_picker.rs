use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, dialog_block, hint_line, list_row, move_selection, PickerOutcome};
use crate::constants::editing::REFRESH_MATCH_TOLERANCE;
use crate::types::{Mode, Monitor};
use crate::ui::constants::{ACTIVE, DIALOG_WIDTH};

/// Resolution/refresh picker; modes come from the last compositor read
#[derive(Debug, Clone, PartialEq)]
pub struct ModePickerState {
    pub monitor: String,
    pub modes: Vec<Mode>,
    pub current: Mode,
    pub selected: usize,
}

fn matches_current(mode: &Mode, current: &Mode) -> bool {
    mode.width == current.width
        && mode.height == current.height
        && (mode.refresh_rate - current.refresh_rate).abs() < REFRESH_MATCH_TOLERANCE
}

/// Largest resolution first, then highest refresh rate
pub fn sort_modes(modes: &mut [Mode]) {
    modes.sort_by(|a, b| {
        b.pixel_count()
            .cmp(&a.pixel_count())
            .then(b.refresh_rate.total_cmp(&a.refresh_rate))
    });
}

impl ModePickerState {
    pub fn new(monitor: &Monitor) -> Self {
        let mut modes = monitor.modes.clone();
        sort_modes(&mut modes);
        let current = Mode::new(monitor.width, monitor.height, monitor.refresh_rate);
        let selected = modes.iter().position(|m| matches_current(m, &current)).unwrap_or(0);
        Self {
            monitor: monitor.name.clone(),
            modes,
            current,
            selected,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome<Mode> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => PickerOutcome::Cancelled,
            KeyCode::Enter | KeyCode::Char(' ') => match self.modes.get(self.selected) {
                Some(mode) => PickerOutcome::Selected(*mode),
                None => PickerOutcome::Cancelled,
            },
            KeyCode::Char(c @ ('1' | '4')) => {
                let (w, h) = if c == '1' { (1920, 1080) } else { (3840, 2160) };
                match self.modes.iter().position(|m| m.width == w && m.height == h) {
                    Some(idx) => {
                        self.selected = idx;
                        PickerOutcome::Selected(self.modes[idx])
                    }
                    None => PickerOutcome::Pending,
                }
            }
            code => {
                self.selected = move_selection(self.selected, self.modes.len(), code);
                PickerOutcome::Pending
            }
        }
    }

    /// Window of `visible` rows that keeps the selection on screen
    fn visible_range(&self, visible: usize) -> std::ops::Range<usize> {
        let visible = visible.max(1);
        let start = (self.selected + 1).saturating_sub(visible);
        start..(start + visible).min(self.modes.len())
    }
}

fn recommendation(mode: &Mode) -> Option<&'static str> {
    match (mode.width, mode.height) {
        (1920, 1080) if mode.refresh_rate >= 144.0 => Some("Full HD Gaming"),
        (1920, 1080) if mode.refresh_rate >= 60.0 => Some("Full HD"),
        (2560, 1440) if mode.refresh_rate >= 144.0 => Some("1440p Gaming"),
        (2560, 1440) => Some("1440p"),
        (3840, 2160) if mode.refresh_rate >= 60.0 => Some("4K UHD"),
        (3440, 1440) => Some("Ultrawide"),
        _ => None,
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ModePickerState) {
    let height = area.height.saturating_sub(2).min(state.modes.len() as u16 + 5);
    let rect = centered_rect(DIALOG_WIDTH, height, area);
    let list_rows = rect.height.saturating_sub(5) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for i in state.visible_range(list_rows) {
        let mode = &state.modes[i];
        let mut text = mode.to_string();
        let is_current = matches_current(mode, &state.current);
        if is_current {
            text.push_str(" (current)");
        }
        if let Some(rec) = recommendation(mode) {
            text.push_str(&format!(" - {rec}"));
        }
        let mut row = list_row(text, i == state.selected);
        if is_current && i != state.selected {
            row = row.style(Style::default().fg(ACTIVE));
        }
        lines.push(row);
    }
    lines.push(Line::default());
    lines.push(hint_line("↑/↓: Navigate  •  Enter: Select  •  1: 1080p  •  4: 4K  •  Esc: Cancel"));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(dialog_block(format!("Resolution & Refresh Rate for {}", state.monitor))),
        rect,
    );
}
