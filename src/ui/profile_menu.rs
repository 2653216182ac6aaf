//! Full-screen profile selection page
//!
//! Lists saved profiles in custom order followed by an entry that opens the
//! layout editor. Supports reordering, renaming and deleting in place.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use super::components::text_input::TextInput;
use super::components::{centered_rect, dialog_block, hint_line};
use super::constants::{ACTIVE, CANVAS_BORDER, ERROR, HINT, SELECTED, TITLE};
use crate::config::profile::sanitize_profile_name;
use crate::config::ProfileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Profile(String),
    Separator,
    OpenEditor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Continue,
    Quit,
    OpenEditor,
    Apply(String),
}

#[derive(Debug, Clone)]
pub struct ProfileMenu {
    pub entries: Vec<MenuEntry>,
    pub selected: usize,
    /// Profile waiting for a y/n delete answer
    pub confirm_delete: Option<String>,
    /// Profile being renamed and the edit buffer
    pub renaming: Option<(String, TextInput)>,
    pub show_help: bool,
    pub error: Option<String>,
    /// Profile matching the live compositor layout
    pub active: Option<String>,
}

fn build_entries(names: Vec<String>) -> Vec<MenuEntry> {
    let has_profiles = !names.is_empty();
    let mut entries: Vec<MenuEntry> = names.into_iter().map(MenuEntry::Profile).collect();
    if has_profiles {
        entries.push(MenuEntry::Separator);
    }
    entries.push(MenuEntry::OpenEditor);
    entries
}

impl ProfileMenu {
    pub fn load(store: &ProfileStore, active: Option<String>) -> Result<Self> {
        Ok(Self {
            entries: build_entries(store.ordered_list()?),
            selected: 0,
            confirm_delete: None,
            renaming: None,
            show_help: false,
            error: None,
            active,
        })
    }

    pub fn profile_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Profile(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn selected_profile(&self) -> Option<&str> {
        match self.entries.get(self.selected) {
            Some(MenuEntry::Profile(name)) => Some(name),
            _ => None,
        }
    }

    /// Rebuild the list from disk, keeping `focus` selected when present
    fn reload(&mut self, store: &ProfileStore, focus: Option<&str>) {
        match store.ordered_list() {
            Ok(names) => self.entries = build_entries(names),
            Err(e) => {
                warn!(error = %e, "Failed to reload profiles");
                self.error = Some(format!("{e:#}"));
            }
        }
        let found = focus.and_then(|name| {
            self.entries
                .iter()
                .position(|e| matches!(e, MenuEntry::Profile(n) if n == name))
        });
        self.selected = found.unwrap_or(self.selected).min(self.entries.len().saturating_sub(1));
        if self.entries.get(self.selected) == Some(&MenuEntry::Separator) {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    fn move_up(&mut self) {
        if self.selected == 0 {
            return;
        }
        self.selected -= 1;
        if self.entries[self.selected] == MenuEntry::Separator && self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn move_down(&mut self) {
        if self.selected + 1 >= self.entries.len() {
            return;
        }
        self.selected += 1;
        if self.entries[self.selected] == MenuEntry::Separator && self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    /// Swap the selected profile with its neighbour and persist the order
    fn reorder(&mut self, store: &ProfileStore, up: bool) {
        if self.selected_profile().is_none() {
            return;
        }
        let other = if up {
            match self.selected.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        } else {
            self.selected + 1
        };
        if !matches!(self.entries.get(other), Some(MenuEntry::Profile(_))) {
            return;
        }

        self.entries.swap(self.selected, other);
        self.selected = other;
        if let Err(e) = store.save_order(&self.profile_names()) {
            warn!(error = %e, "Failed to save profile order");
            self.error = Some(format!("{e:#}"));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, store: &ProfileStore) -> MenuOutcome {
        if self.show_help {
            self.show_help = false;
            return MenuOutcome::Continue;
        }
        if self.renaming.is_some() {
            self.handle_rename_key(key, store);
            return MenuOutcome::Continue;
        }
        if let Some(name) = self.confirm_delete.take() {
            if let KeyCode::Char('y' | 'Y') = key.code {
                match store.delete(&name) {
                    Ok(()) => {
                        self.error = None;
                        if self.active.as_deref() == Some(name.as_str()) {
                            self.active = None;
                        }
                        self.reload(store, None);
                    }
                    Err(e) => self.error = Some(format!("{e:#}")),
                }
            }
            return MenuOutcome::Continue;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return MenuOutcome::Quit,
            KeyCode::Char('c') if ctrl => return MenuOutcome::Quit,
            KeyCode::Up if shift => self.reorder(store, true),
            KeyCode::Down if shift => self.reorder(store, false),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Enter => match self.entries.get(self.selected) {
                Some(MenuEntry::OpenEditor) => return MenuOutcome::OpenEditor,
                Some(MenuEntry::Profile(name)) => return MenuOutcome::Apply(name.clone()),
                _ => {}
            },
            KeyCode::Char('d' | 'D') => {
                if let Some(name) = self.selected_profile() {
                    self.confirm_delete = Some(name.to_string());
                }
            }
            KeyCode::Char('r' | 'R') => {
                if let Some(name) = self.selected_profile() {
                    self.renaming = Some((name.to_string(), TextInput::with_value(name)));
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        MenuOutcome::Continue
    }

    fn handle_rename_key(&mut self, key: KeyEvent, store: &ProfileStore) {
        let Some((old_name, input)) = self.renaming.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.renaming = None,
            KeyCode::Enter => {
                let old_name = old_name.clone();
                let new_name = sanitize_profile_name(input.value());
                self.renaming = None;
                if new_name.is_empty() || new_name == old_name {
                    return;
                }
                match store.rename(&old_name, &new_name) {
                    Ok(()) => {
                        info!(from = %old_name, to = %new_name, "Profile renamed from menu");
                        self.error = None;
                        if self.active.as_deref() == Some(old_name.as_str()) {
                            self.active = Some(new_name.clone());
                        }
                        self.reload(store, Some(&new_name));
                    }
                    Err(e) => self.error = Some(format!("{e:#}")),
                }
            }
            _ => {
                input.handle_key(key);
            }
        }
    }
}

const HELP: &[(&str, &str)] = &[
    ("↑/↓ or k/j", "Move selection up/down"),
    ("Shift+↑/↓", "Reorder profile position"),
    ("Enter", "Apply selected profile"),
    ("r", "Rename selected profile"),
    ("d", "Delete selected profile (with confirmation)"),
    ("?", "Show this help"),
    ("q / Esc / Ctrl+C", "Exit"),
];

fn render_help(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("HyprMon Profiles v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(SELECTED).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    for (key, desc) in HELP {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<20}"), Style::default().fg(SELECTED)),
            Span::raw(*desc),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from("Profiles store position, mode, scale and advanced settings."));
    lines.push(Line::from("Apply directly with: hyprmon --profile NAME"));
    lines.push(Line::default());
    lines.push(hint_line("Press any key to close help"));

    let rect = centered_rect(64, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(dialog_block("Help".to_string())), rect);
}

fn prompt_box(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, color: ratatui::style::Color) {
    let rect = centered_rect(56, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(format!(" {title} ")),
        ),
        rect,
    );
}

pub fn render(frame: &mut Frame, menu: &ProfileMenu) {
    let area = frame.area();
    let [title_area, body_area, footer_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "HyprMon - Profile Selection",
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ))),
        title_area,
    );

    let mut lines: Vec<Line> = Vec::new();
    if let Some(err) = &menu.error {
        lines.push(Line::from(Span::styled(format!("Error: {err}"), Style::default().fg(ERROR))));
        lines.push(Line::default());
    }
    if menu.entries.len() == 1 {
        lines.push(Line::from(Span::styled("No saved profiles yet", Style::default().fg(HINT))));
        lines.push(Line::default());
    }
    for (i, entry) in menu.entries.iter().enumerate() {
        if *entry == MenuEntry::Separator {
            lines.push(Line::from(Span::styled("──────────────────", Style::default().fg(CANVAS_BORDER))));
            continue;
        }
        let is_active = matches!(entry, MenuEntry::Profile(n) if menu.active.as_deref() == Some(n.as_str()));
        let mut text = entry_label(entry);
        if is_active {
            text.push_str(" *");
        }
        let line = if i == menu.selected {
            Line::from(Span::styled(
                format!("▶ {text}"),
                Style::default().fg(SELECTED).add_modifier(Modifier::BOLD),
            ))
        } else if is_active {
            Line::from(Span::styled(format!("  {text}"), Style::default().fg(ACTIVE)))
        } else {
            Line::from(format!("  {text}"))
        };
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines), body_area);

    frame.render_widget(
        Paragraph::new(hint_line(
            "↑/↓ Navigate  •  Shift+↑/↓ Reorder  •  Enter Select  •  r Rename  •  d Delete  •  ? Help  •  q Quit",
        )),
        footer_area,
    );

    if let Some((old, input)) = &menu.renaming {
        let (before, after) = input.split_at_cursor();
        prompt_box(
            frame,
            area,
            "Rename",
            vec![
                Line::from(format!("Rename profile '{old}':")),
                Line::default(),
                Line::from(vec![
                    Span::raw(before.to_string()),
                    Span::styled("│", Style::default().fg(SELECTED)),
                    Span::raw(after.to_string()),
                ]),
                Line::default(),
                hint_line("Enter: Save  •  Esc: Cancel"),
            ],
            ACTIVE,
        );
    } else if let Some(name) = &menu.confirm_delete {
        prompt_box(
            frame,
            area,
            "Delete",
            vec![
                Line::from(format!("Delete profile '{name}'?")),
                Line::default(),
                hint_line("Press y to confirm, n to cancel"),
            ],
            ERROR,
        );
    }

    if menu.show_help {
        render_help(frame, area);
    }
}

fn entry_label(entry: &MenuEntry) -> String {
    match entry {
        MenuEntry::Profile(name) => name.clone(),
        MenuEntry::Separator => String::new(),
        MenuEntry::OpenEditor => "[ Open Full UI ]".to_string(),
    }
}
