//! Per-monitor bit depth, colour, SDR, VRR and transform dialog
//!
//! Edits happen on a draft copy of the values; nothing reaches the session
//! until the dialog is confirmed.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, dialog_block, hint_line, PickerOutcome};
use crate::constants::editing::{SDR_BRIGHTNESS_RANGE, SDR_SATURATION_RANGE, SDR_STEP};
use crate::types::{ColorMode, Monitor, Transform, Vrr};
use crate::ui::constants::{ADVANCED_DIALOG_HEIGHT, DIALOG_WIDTH, HINT, SELECTED};

const SLIDER_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancedValues {
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub sdr_brightness: f32,
    pub sdr_saturation: f32,
    pub vrr: Vrr,
    pub transform: Transform,
}

impl AdvancedValues {
    pub fn from_monitor(monitor: &Monitor) -> Self {
        Self {
            bit_depth: monitor.bit_depth,
            color_mode: monitor.color_mode,
            sdr_brightness: monitor.sdr_brightness,
            sdr_saturation: monitor.sdr_saturation,
            vrr: monitor.vrr,
            transform: monitor.transform,
        }
    }

    pub fn apply_to(&self, monitor: &mut Monitor) {
        monitor.bit_depth = self.bit_depth;
        monitor.color_mode = self.color_mode;
        monitor.sdr_brightness = self.sdr_brightness;
        monitor.sdr_saturation = self.sdr_saturation;
        monitor.vrr = self.vrr;
        monitor.transform = self.transform;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BitDepth,
    ColorMode,
    SdrBrightness,
    SdrSaturation,
    Vrr,
    Transform,
}

impl Field {
    const ALL: [Field; 6] = [
        Field::BitDepth,
        Field::ColorMode,
        Field::SdrBrightness,
        Field::SdrSaturation,
        Field::Vrr,
        Field::Transform,
    ];

    fn is_sdr(self) -> bool {
        matches!(self, Field::SdrBrightness | Field::SdrSaturation)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedSettingsState {
    pub monitor: String,
    pub values: AdvancedValues,
    pub focused: Field,
}

impl AdvancedSettingsState {
    pub fn new(monitor: &Monitor) -> Self {
        Self {
            monitor: monitor.name.clone(),
            values: AdvancedValues::from_monitor(monitor),
            focused: Field::BitDepth,
        }
    }

    fn step_focus(&mut self, forward: bool) {
        let len = Field::ALL.len();
        let mut pos = self.focused.position();
        loop {
            pos = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
            let field = Field::ALL[pos];
            // SDR sliders are hidden outside HDR
            if !field.is_sdr() || self.values.color_mode.is_hdr() {
                self.focused = field;
                return;
            }
        }
    }

    fn adjust(&mut self, delta: f32) {
        let (value, (min, max)) = match self.focused {
            Field::SdrBrightness => (&mut self.values.sdr_brightness, SDR_BRIGHTNESS_RANGE),
            Field::SdrSaturation => (&mut self.values.sdr_saturation, SDR_SATURATION_RANGE),
            _ => return,
        };
        *value = ((*value + delta).clamp(min, max) * 10.0).round() / 10.0;
    }

    fn toggle(&mut self) {
        match self.focused {
            Field::BitDepth => {
                self.values.bit_depth = if self.values.bit_depth == 10 { 8 } else { 10 };
            }
            Field::ColorMode => self.values.color_mode = self.values.color_mode.next(),
            Field::Vrr => self.values.vrr = self.values.vrr.next(),
            Field::Transform => self.values.transform = self.values.transform.next(),
            Field::SdrBrightness | Field::SdrSaturation => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome<AdvancedValues> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return PickerOutcome::Cancelled,
            KeyCode::Enter => return PickerOutcome::Selected(self.values),
            KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => self.step_focus(false),
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => self.step_focus(true),
            KeyCode::Left | KeyCode::Char('h') => self.adjust(-SDR_STEP),
            KeyCode::Right | KeyCode::Char('l') => self.adjust(SDR_STEP),
            KeyCode::Char(' ') => self.toggle(),
            _ => {}
        }
        PickerOutcome::Pending
    }
}

fn radio<T: PartialEq>(options: &[(T, &str)], current: &T) -> String {
    options
        .iter()
        .map(|(value, label)| {
            let mark = if value == current { '●' } else { '○' };
            format!("{mark} {label}")
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn slider(value: f32, (min, max): (f32, f32)) -> String {
    let pos = (((value - min) / (max - min)) * SLIDER_WIDTH as f32).max(0.0) as usize;
    let pos = pos.min(SLIDER_WIDTH - 1);
    let track: String = (0..SLIDER_WIDTH).map(|i| if i == pos { '●' } else { '─' }).collect();
    format!("[{track}] {value:.1}")
}

fn color_mode_value(mode: ColorMode) -> String {
    let shown = [
        (ColorMode::Auto, "Auto"),
        (ColorMode::Srgb, "sRGB"),
        (ColorMode::Wide, "Wide"),
        (ColorMode::Hdr, "HDR"),
    ];
    match mode {
        ColorMode::Edid => "● EDID".to_string(),
        ColorMode::HdrEdid => "● HDR-EDID".to_string(),
        _ => radio(&shown, &mode),
    }
}

fn transform_value(transform: Transform) -> String {
    if transform.index() <= 3 {
        let rotations = [
            (Transform::Normal, "Normal"),
            (Transform::Rotate90, "90°"),
            (Transform::Rotate180, "180°"),
            (Transform::Rotate270, "270°"),
        ];
        radio(&rotations, &transform)
    } else {
        format!("Flipped: {}", transform.label())
    }
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let (marker, style) = if focused {
        ("▶ ", Style::default().fg(SELECTED).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default())
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<16}"), style),
        Span::styled(value, style),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, state: &AdvancedSettingsState) {
    let v = &state.values;
    let mut lines = vec![
        field_line(
            "Bit Depth:",
            radio(&[(8u8, "8-bit"), (10u8, "10-bit")], &v.bit_depth),
            state.focused == Field::BitDepth,
        ),
        field_line("Color Mode:", color_mode_value(v.color_mode), state.focused == Field::ColorMode),
    ];
    if v.color_mode.is_hdr() {
        lines.push(field_line(
            "SDR Brightness:",
            slider(v.sdr_brightness, SDR_BRIGHTNESS_RANGE),
            state.focused == Field::SdrBrightness,
        ));
        lines.push(field_line(
            "SDR Saturation:",
            slider(v.sdr_saturation, SDR_SATURATION_RANGE),
            state.focused == Field::SdrSaturation,
        ));
    }
    lines.push(field_line(
        "VRR:",
        radio(&[(Vrr::Off, "Off"), (Vrr::On, "On"), (Vrr::Fullscreen, "Fullscreen")], &v.vrr),
        state.focused == Field::Vrr,
    ));
    lines.push(field_line("Transform:", transform_value(v.transform), state.focused == Field::Transform));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Space toggles, ←/→ adjust sliders",
        Style::default().fg(HINT).add_modifier(Modifier::ITALIC),
    )));
    lines.push(hint_line("↑/↓: Navigate  •  Enter: Apply  •  Esc: Cancel"));

    let rect = centered_rect(DIALOG_WIDTH + 8, ADVANCED_DIALOG_HEIGHT, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(dialog_block(format!("Advanced Settings for {}", state.monitor))),
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

    fn state() -> AdvancedSettingsState {
        AdvancedSettingsState::new(&Monitor::new("DP-1", 3840, 2160, 60.0))
    }

    #[test]
    fn test_navigation_skips_sdr_without_hdr() {
        let mut s = state();
        s.handle_key(key(KeyCode::Down));
        assert_eq!(s.focused, Field::ColorMode);
        s.handle_key(key(KeyCode::Down));
        assert_eq!(s.focused, Field::Vrr);
        s.handle_key(key(KeyCode::Up));
        assert_eq!(s.focused, Field::ColorMode);

        s.focused = Field::BitDepth;
        s.handle_key(key(KeyCode::BackTab));
        assert_eq!(s.focused, Field::Transform);
    }

    #[test]
    fn test_navigation_visits_sdr_in_hdr() {
        let mut s = state();
        s.values.color_mode = ColorMode::Hdr;
        s.focused = Field::ColorMode;
        s.handle_key(key(KeyCode::Tab));
        assert_eq!(s.focused, Field::SdrBrightness);
        s.handle_key(key(KeyCode::Tab));
        assert_eq!(s.focused, Field::SdrSaturation);
    }

    #[test]
    fn test_sdr_adjust_clamps_and_rounds() {
        let mut s = state();
        s.values.color_mode = ColorMode::HdrEdid;
        s.focused = Field::SdrBrightness;
        for _ in 0..20 {
            s.handle_key(key(KeyCode::Right));
        }
        assert_eq!(s.values.sdr_brightness, 2.0);

        s.focused = Field::SdrSaturation;
        s.handle_key(key(KeyCode::Left));
        s.handle_key(key(KeyCode::Left));
        s.handle_key(key(KeyCode::Left));
        assert_eq!(s.values.sdr_saturation, 0.7);
        for _ in 0..10 {
            s.handle_key(key(KeyCode::Left));
        }
        assert_eq!(s.values.sdr_saturation, 0.5);
    }

    #[test]
    fn test_space_toggles_focused_value() {
        let mut s = state();
        s.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(s.values.bit_depth, 10);
        s.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(s.values.bit_depth, 8);

        s.focused = Field::Transform;
        s.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(s.values.transform, Transform::Rotate90);

        s.focused = Field::Vrr;
        s.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(s.values.vrr, Vrr::On);
    }

    #[test]
    fn test_enter_returns_draft_and_esc_discards() {
        let mut s = state();
        s.handle_key(key(KeyCode::Char(' ')));
        let PickerOutcome::Selected(values) = s.handle_key(key(KeyCode::Enter)) else {
            panic!("expected selection");
        };
        let mut mon = Monitor::new("DP-1", 3840, 2160, 60.0);
        values.apply_to(&mut mon);
        assert_eq!(mon.bit_depth, 10);

        assert_eq!(s.handle_key(key(KeyCode::Esc)), PickerOutcome::Cancelled);
    }

    #[test]
    fn test_slider_marks_position() {
        assert_eq!(slider(0.5, SDR_SATURATION_RANGE), format!("[●{}] 0.5", "─".repeat(19)));
        assert!(slider(2.0, SDR_BRIGHTNESS_RANGE).starts_with(&format!("[{}●]", "─".repeat(19))));
    }
}
