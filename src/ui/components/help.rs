use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, dialog_block, PickerOutcome};
use crate::ui::constants::{ACTIVE, HELP_CHROME_ROWS, HINT, SELECTED};

const KEYBOARD: &[(&str, &str)] = &[
    ("↑↓←→ / hjkl", "Move selected monitor by grid step"),
    ("Shift+↑↓←→ / HJKL", "Move by 10x step"),
    ("Tab / Shift+Tab", "Select next/previous monitor"),
    ("Enter / Space", "Toggle monitor on/off"),
    ("g", "Cycle grid size (1, 8, 16, 32, 64 px)"),
    ("L", "Cycle snap mode (Off, Edges, Centers, Both)"),
    ("r", "Open scale picker"),
    ("f", "Open resolution & refresh rate picker"),
    ("m", "Open mirror settings"),
    ("c / d", "Open advanced settings"),
    ("a", "Apply changes to Hyprland"),
    ("s", "Save configuration to file"),
    ("z", "Revert to previous configuration"),
    ("o", "Open profiles page"),
    ("p", "Save as profile"),
    ("?", "Show this help"),
    ("q / Ctrl+C", "Quit"),
];

const MOUSE: &[(&str, &str)] = &[
    ("Left Click", "Select monitor"),
    ("Drag", "Move selected monitor"),
    ("Right Click", "Toggle monitor on/off"),
    ("Scroll Wheel", "Adjust scale"),
];

const NAVIGATION: &[(&str, &str)] = &[
    ("↑/↓", "Scroll up/down"),
    ("PgUp/PgDn", "Page up/down"),
    ("Home/End", "Jump to top/bottom"),
    ("Esc/q", "Close help"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpState {
    pub scroll: usize,
}

impl HelpState {
    /// Keys scroll within `visible` rows; Esc, q and ? close
    pub fn handle_key(&mut self, key: KeyEvent, visible: usize) -> PickerOutcome<()> {
        let max = max_scroll(visible);
        let page = visible.max(1);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => return PickerOutcome::Cancelled,
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = (self.scroll + 1).min(max),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(page),
            KeyCode::PageDown => self.scroll = (self.scroll + page).min(max),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = max,
            _ => {}
        }
        PickerOutcome::Pending
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, visible: usize) {
        self.scroll = (self.scroll + 1).min(max_scroll(visible));
    }
}

fn max_scroll(visible: usize) -> usize {
    help_lines().len().saturating_sub(visible)
}

/// Rows of help content that fit in a terminal of `term_height` rows
pub fn visible_rows(term_height: u16) -> usize {
    term_height.saturating_sub(2 + HELP_CHROME_ROWS) as usize
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD),
    ))
}

fn entries(lines: &mut Vec<Line<'static>>, items: &[(&'static str, &'static str)]) {
    for (key, desc) in items {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<20}"), Style::default().fg(SELECTED)),
            Span::raw(*desc),
        ]));
    }
}

pub fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("HyprMon v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(SELECTED).add_modifier(Modifier::BOLD),
        )),
        Line::from("A visual monitor configuration tool for Hyprland."),
        Line::default(),
        section("Keyboard Shortcuts:"),
    ];
    entries(&mut lines, KEYBOARD);
    lines.push(Line::default());
    lines.push(section("Mouse Controls:"));
    entries(&mut lines, MOUSE);
    lines.push(Line::default());
    lines.push(section("Navigation (in this help):"));
    entries(&mut lines, NAVIGATION);
    lines
}

pub fn render(frame: &mut Frame, area: Rect, state: &HelpState) {
    let rect = centered_rect(area.width.saturating_sub(8).max(40), area.height.saturating_sub(2), area);
    let visible = rect.height.saturating_sub(HELP_CHROME_ROWS) as usize;
    let all = help_lines();
    let total = all.len();
    let offset = state.scroll.min(total.saturating_sub(visible));

    let mut lines: Vec<Line> = all.into_iter().skip(offset).take(visible).collect();
    while lines.len() < visible {
        lines.push(Line::default());
    }
    let footer = if total > visible {
        format!(
            "Lines {}-{} of {total} • ↑↓ or PgUp/PgDn to scroll • Esc to close",
            offset + 1,
            (offset + visible).min(total)
        )
    } else {
        "Esc or q to close".to_string()
    };
    lines.push(Line::from(Span::styled(
        "─".repeat(rect.width.saturating_sub(4).min(70) as usize),
        Style::default().fg(HINT),
    )));
    lines.push(Line::from(Span::styled(footer, Style::default().fg(HINT))));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(dialog_block("Help".to_string())), rect);
}
