//! Modal dialogs shown on top of the layout canvas
//!
//! Each component owns a small state struct with a `handle_key` that reports
//! a [`PickerOutcome`] and a `render` function drawing the dialog.

pub mod advanced_settings;
pub mod help;
pub mod mirror_picker;
pub mod mode_picker;
pub mod profile_input;
pub mod scale_picker;
pub mod text_input;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

use super::constants::{HINT, SELECTED, TITLE};

/// Result of feeding one key to a dialog
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome<T> {
    Pending,
    Selected(T),
    Cancelled,
}

/// List navigation shared by the pickers (arrows, vi keys, home/end)
pub fn move_selection(selected: usize, len: usize, code: KeyCode) -> usize {
    if len == 0 {
        return 0;
    }
    match code {
        KeyCode::Up | KeyCode::Char('k') => selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => (selected + 1).min(len - 1),
        KeyCode::Home | KeyCode::Char('g') => 0,
        KeyCode::End | KeyCode::Char('G') => len - 1,
        _ => selected,
    }
}

/// Rectangle of at most `width` x `height` centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn dialog_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(SELECTED))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ))
}

/// Selectable list row with the `▶` marker on the focused entry
pub fn list_row(text: String, focused: bool) -> Line<'static> {
    if focused {
        Line::from(Span::styled(
            format!("▶ {text}"),
            Style::default().fg(SELECTED).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(format!("  {text}"))
    }
}

pub fn hint_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(HINT)))
}
