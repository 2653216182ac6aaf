use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, dialog_block, hint_line, list_row, move_selection, PickerOutcome};
use crate::mirror;
use crate::types::Monitor;
use crate::ui::constants::{ACTIVE, DIALOG_WIDTH, HINT, WARNING};

#[derive(Debug, Clone, PartialEq)]
pub struct MirrorOption {
    /// `None` disables mirroring
    pub source: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MirrorPickerState {
    pub monitor: String,
    pub width: u32,
    pub height: u32,
    pub current_source: Option<String>,
    pub options: Vec<MirrorOption>,
    /// Monitors that currently mirror this one
    pub mirrored_by: Vec<String>,
    pub selected: usize,
}

impl MirrorPickerState {
    pub fn new(monitor: &Monitor, monitors: &[Monitor]) -> Self {
        let mut options = vec![MirrorOption {
            source: None,
            width: monitor.width,
            height: monitor.height,
        }];
        options.extend(mirror::eligible_sources(&monitor.name, monitors).into_iter().filter_map(|name| {
            monitors.iter().find(|m| m.name == name).map(|m| MirrorOption {
                source: Some(m.name.clone()),
                width: m.width,
                height: m.height,
            })
        }));

        let selected = options
            .iter()
            .position(|o| o.source == monitor.mirror_source)
            .unwrap_or(0);

        Self {
            monitor: monitor.name.clone(),
            width: monitor.width,
            height: monitor.height,
            current_source: monitor.mirror_source.clone(),
            options,
            mirrored_by: mirror::mirror_targets(&monitor.name, monitors)
                .into_iter()
                .map(str::to_string)
                .collect(),
            selected,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome<Option<String>> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => PickerOutcome::Cancelled,
            KeyCode::Enter | KeyCode::Char(' ') => match self.options.get(self.selected) {
                Some(option) => PickerOutcome::Selected(option.source.clone()),
                None => PickerOutcome::Cancelled,
            },
            code => {
                self.selected = move_selection(self.selected, self.options.len(), code);
                PickerOutcome::Pending
            }
        }
    }

    fn resolution_differs(&self, option: &MirrorOption) -> bool {
        option.source.is_some() && (option.width != self.width || option.height != self.height)
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &MirrorPickerState) {
    let mut lines: Vec<Line> = Vec::new();

    if state.options.len() == 1 {
        lines.push(Line::from(Span::styled(
            "No monitors available to mirror",
            Style::default().fg(HINT),
        )));
        lines.push(Line::default());
    }

    for (i, option) in state.options.iter().enumerate() {
        let mut text = match &option.source {
            None => "None (disable mirroring)".to_string(),
            Some(name) => format!("{name} ({}x{})", option.width, option.height),
        };
        let is_current = option.source == state.current_source;
        if is_current {
            text.push_str(" (current)");
        }
        if state.resolution_differs(option) {
            text.push_str(" ⚠");
        }
        let mut row = list_row(text, i == state.selected);
        if is_current && i != state.selected {
            row = row.style(Style::default().fg(ACTIVE));
        }
        lines.push(row);
    }

    if let Some(option) = state.options.get(state.selected)
        && state.resolution_differs(option)
    {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                "⚠ Resolution mismatch: {}x{} will show {}x{} content",
                state.width, state.height, option.width, option.height
            ),
            Style::default().fg(WARNING),
        )));
    }

    if !state.mirrored_by.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Mirrored by: {}", state.mirrored_by.join(", ")),
            Style::default().fg(HINT),
        )));
    }

    lines.push(Line::default());
    lines.push(hint_line("↑/↓: Navigate  •  Enter: Select  •  Esc: Cancel"));

    let rect = centered_rect(DIALOG_WIDTH, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(dialog_block(format!("Mirror Settings for {}", state.monitor))),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn monitors() -> Vec<Monitor> {
        vec![
            Monitor::new("eDP-1", 1920, 1080, 60.0),
            Monitor::new("DP-1", 2560, 1440, 144.0),
            Monitor::new("DP-2", 1920, 1080, 60.0).inactive(),
        ]
    }

    #[test]
    fn test_options_start_with_none_and_skip_inactive() {
        let all = monitors();
        let picker = MirrorPickerState::new(&all[0], &all);
        let sources: Vec<Option<&str>> = picker.options.iter().map(|o| o.source.as_deref()).collect();
        assert_eq!(sources, vec![None, Some("DP-1")]);
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_preselects_current_source() {
        let mut all = monitors();
        all[0].mirror_source = Some("DP-1".to_string());
        let picker = MirrorPickerState::new(&all[0], &all);
        assert_eq!(picker.selected, 1);

        let source_picker = MirrorPickerState::new(&all[1], &all);
        assert_eq!(source_picker.mirrored_by, vec!["eDP-1"]);
        // eDP-1 already mirrors DP-1, so it cannot become DP-1's source
        assert_eq!(source_picker.options.len(), 1);
    }

    #[test]
    fn test_select_outcomes() {
        let all = monitors();
        let mut picker = MirrorPickerState::new(&all[0], &all);
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerOutcome::Selected(None));
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter)),
            PickerOutcome::Selected(Some("DP-1".to_string()))
        );
        assert_eq!(picker.handle_key(key(KeyCode::Char('q'))), PickerOutcome::Cancelled);
    }

    #[test]
    fn test_resolution_mismatch_flag() {
        let all = monitors();
        let picker = MirrorPickerState::new(&all[0], &all);
        assert!(!picker.resolution_differs(&picker.options[0]));
        assert!(picker.resolution_differs(&picker.options[1]));
    }
}
