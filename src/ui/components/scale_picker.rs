use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, dialog_block, hint_line, list_row, move_selection, PickerOutcome};
use crate::constants::editing::{COMMON_SCALES, DEFAULT_SCALE_INDEX};
use crate::ui::constants::{ACTIVE, DIALOG_WIDTH, GUIDE, HINT};
use crate::types::Monitor;

/// Scale picker state for one monitor
#[derive(Debug, Clone, PartialEq)]
pub struct ScalePickerState {
    pub monitor: String,
    pub current: f32,
    pub width: u32,
    pub height: u32,
    pub selected: usize,
}

fn same_scale(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.001
}

impl ScalePickerState {
    pub fn new(monitor: &Monitor) -> Self {
        let selected = COMMON_SCALES
            .iter()
            .position(|&s| same_scale(s, monitor.scale))
            .unwrap_or(DEFAULT_SCALE_INDEX);
        Self {
            monitor: monitor.name.clone(),
            current: monitor.scale,
            width: monitor.width,
            height: monitor.height,
            selected,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome<f32> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => PickerOutcome::Cancelled,
            KeyCode::Enter | KeyCode::Char(' ') => PickerOutcome::Selected(COMMON_SCALES[self.selected]),
            KeyCode::Char(c @ ('1' | '2')) => {
                let target = if c == '1' { 1.0 } else { 2.0 };
                match COMMON_SCALES.iter().position(|&s| same_scale(s, target)) {
                    Some(idx) => {
                        self.selected = idx;
                        PickerOutcome::Selected(COMMON_SCALES[idx])
                    }
                    None => PickerOutcome::Pending,
                }
            }
            code => {
                self.selected = move_selection(self.selected, COMMON_SCALES.len(), code);
                PickerOutcome::Pending
            }
        }
    }

    /// Logical resolution at the highlighted scale
    pub fn effective_resolution(&self) -> (u32, u32) {
        let scale = COMMON_SCALES[self.selected];
        (
            (self.width as f32 / scale) as u32,
            (self.height as f32 / scale) as u32,
        )
    }
}

fn recommendation(scale: f32) -> Option<&'static str> {
    [(1.0, "No scaling"), (1.25, "Good for 27\" 4K"), (1.5, "Good for 24\" 4K"), (2.0, "HiDPI/Retina")]
        .into_iter()
        .find(|(s, _)| same_scale(*s, scale))
        .map(|(_, text)| text)
}

pub fn render(frame: &mut Frame, area: Rect, state: &ScalePickerState) {
    let mut lines: Vec<Line> = Vec::with_capacity(COMMON_SCALES.len() + 6);

    for (i, &scale) in COMMON_SCALES.iter().enumerate() {
        let mut text = format!("{scale:.2}x");
        if same_scale(scale, 1.0) {
            text.push_str(" (native)");
        } else if same_scale(scale, state.current) {
            text.push_str(" (current)");
        }
        text.push_str(&format!(" - {} DPI", (96.0 * scale) as u32));
        if let Some(rec) = recommendation(scale) {
            text.push_str(&format!(" - {rec}"));
        }

        let mut row = list_row(text, i == state.selected);
        if i != state.selected && same_scale(scale, state.current) {
            row = row.style(Style::default().fg(ACTIVE));
        }
        lines.push(row);
    }

    let (eff_w, eff_h) = state.effective_resolution();
    lines.push(Line::default());
    lines.push(hint_line("↑/↓: Navigate  •  Enter: Select  •  1: 1.00x  •  2: 2.00x  •  Esc: Cancel"));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("Physical: {}x{} → Effective: {eff_w}x{eff_h}", state.width, state.height),
        Style::default().fg(HINT).add_modifier(Modifier::ITALIC),
    )));

    let height = lines.len() as u16 + 2;
    let rect = centered_rect(DIALOG_WIDTH + 12, height, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(
            dialog_block(format!("Select Scale for {}", state.monitor)).border_style(Style::default().fg(GUIDE)),
        ),
        rect,
    );
}
