use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use super::text_input::TextInput;
use super::{centered_rect, dialog_block, hint_line, PickerOutcome};
use crate::config::profile::{sanitize_profile_name, validate_profile_name};
use crate::ui::constants::{DIALOG_WIDTH, ERROR, HINT, INPUT_DIALOG_HEIGHT, SELECTED, WARNING};

/// Save-as-profile dialog; yields the sanitized name
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInputState {
    pub input: TextInput,
    /// Name waiting for an overwrite y/n answer
    pub confirm_overwrite: Option<String>,
    pub error: Option<String>,
    pub existing: Vec<String>,
}

impl ProfileInputState {
    pub fn new(existing: Vec<String>) -> Self {
        Self {
            input: TextInput::default(),
            confirm_overwrite: None,
            error: None,
            existing,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome<String> {
        if let Some(name) = &self.confirm_overwrite {
            return match key.code {
                KeyCode::Char('y' | 'Y') => PickerOutcome::Selected(name.clone()),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                    self.confirm_overwrite = None;
                    self.error = None;
                    PickerOutcome::Pending
                }
                _ => PickerOutcome::Pending,
            };
        }

        match key.code {
            KeyCode::Esc => PickerOutcome::Cancelled,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PickerOutcome::Cancelled,
            KeyCode::Enter => self.submit(),
            _ => {
                if self.input.handle_key(key) {
                    self.error = None;
                }
                PickerOutcome::Pending
            }
        }
    }

    fn submit(&mut self) -> PickerOutcome<String> {
        if self.input.value().trim().is_empty() {
            self.error = Some("Profile name cannot be empty".to_string());
            return PickerOutcome::Pending;
        }
        let name = sanitize_profile_name(self.input.value());
        if name.is_empty() {
            self.error = Some("Invalid profile name".to_string());
            return PickerOutcome::Pending;
        }
        if let Err(err) = validate_profile_name(&name) {
            self.error = Some(err.to_string());
            return PickerOutcome::Pending;
        }
        if self.existing.iter().any(|p| *p == name) {
            self.confirm_overwrite = Some(name);
            return PickerOutcome::Pending;
        }
        PickerOutcome::Selected(name)
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ProfileInputState) {
    let mut lines: Vec<Line> = Vec::new();

    let title = if let Some(name) = &state.confirm_overwrite {
        lines.push(Line::from(Span::styled(
            format!("Profile '{name}' already exists."),
            Style::default().fg(WARNING),
        )));
        lines.push(Line::from("Do you want to override it? (y/n)"));
        "Profile Already Exists"
    } else {
        let (before, after) = state.input.split_at_cursor();
        lines.push(Line::from(Span::styled("Enter profile name:", Style::default().fg(HINT))));
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::raw(before.to_string()),
            Span::styled("│", Style::default().fg(SELECTED).add_modifier(Modifier::SLOW_BLINK)),
            Span::raw(after.to_string()),
        ]));
        lines.push(Line::default());

        if let Some(err) = &state.error {
            lines.push(Line::from(Span::styled(format!("⚠ {err}"), Style::default().fg(ERROR))));
            lines.push(Line::default());
        }
        if !state.existing.is_empty() {
            lines.push(Line::from(Span::styled("Existing profiles:", Style::default().fg(HINT))));
            for profile in &state.existing {
                lines.push(Line::from(Span::styled(format!("  • {profile}"), Style::default().fg(HINT))));
            }
            lines.push(Line::default());
        }
        lines.push(hint_line("Enter: Save  •  Esc: Cancel  •  Ctrl+U/K: Clear"));
        "Save Profile"
    };

    let height = (lines.len() as u16 + 2).max(INPUT_DIALOG_HEIGHT);
    let rect = centered_rect(DIALOG_WIDTH, height, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(dialog_block(title.to_string())), rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut ProfileInputState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut state = ProfileInputState::new(Vec::new());
        assert_eq!(state.handle_key(key(KeyCode::Enter)), PickerOutcome::Pending);
        assert_eq!(state.error.as_deref(), Some("Profile name cannot be empty"));

        type_text(&mut state, "x");
        assert!(state.error.is_none());
    }

    #[test]
    fn test_name_is_sanitized() {
        let mut state = ProfileInputState::new(Vec::new());
        type_text(&mut state, "home/desk");
        assert_eq!(
            state.handle_key(key(KeyCode::Enter)),
            PickerOutcome::Selected("home-desk".to_string())
        );
    }

    #[test]
    fn test_only_dots_is_invalid() {
        let mut state = ProfileInputState::new(Vec::new());
        type_text(&mut state, "..");
        assert_eq!(state.handle_key(key(KeyCode::Enter)), PickerOutcome::Pending);
        assert_eq!(state.error.as_deref(), Some("Invalid profile name"));
    }

    #[test]
    fn test_overwrite_needs_confirmation() {
        let mut state = ProfileInputState::new(vec!["office".to_string()]);
        type_text(&mut state, "office");
        assert_eq!(state.handle_key(key(KeyCode::Enter)), PickerOutcome::Pending);
        assert_eq!(state.confirm_overwrite.as_deref(), Some("office"));

        assert_eq!(state.handle_key(key(KeyCode::Char('n'))), PickerOutcome::Pending);
        assert!(state.confirm_overwrite.is_none());

        state.handle_key(key(KeyCode::Enter));
        assert_eq!(
            state.handle_key(key(KeyCode::Char('y'))),
            PickerOutcome::Selected("office".to_string())
        );
    }

    #[test]
    fn test_q_is_text_not_cancel() {
        let mut state = ProfileInputState::new(Vec::new());
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), PickerOutcome::Pending);
        assert_eq!(state.input.value(), "q");
        assert_eq!(state.handle_key(key(KeyCode::Esc)), PickerOutcome::Cancelled);
    }
}
