//! Terminal UI for the layout editor and the profile page

pub mod canvas;
pub mod components;
pub mod constants;
pub mod profile_menu;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::session::{Overlay, Session};
use constants::{CANVAS_BORDER, HINT, SELECTED, STATUS, TITLE};

const FOOTER: &str = "↑↓←→ move  •  Shift ×10  •  Tab select  •  Enter toggle  •  g grid  •  L snap  •  r scale  •  f mode  •  m mirror  •  d advanced  •  a apply  •  s save  •  z revert  •  o profiles  •  p save profile  •  ? help  •  q quit";

fn header(session: &Session) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("HyprMon v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  |  Grid: {} px   Snap: {}",
            session.grid_px,
            session.snap_mode.label()
        )),
    ];
    if let Some(profile) = &session.profile_name {
        spans.push(Span::styled(format!("   Profile: {profile}"), Style::default().fg(SELECTED)));
    }
    Line::from(spans)
}

fn details(session: &Session) -> Line<'static> {
    let Some(mon) = session.selected_monitor() else {
        return Line::from(Span::styled("No monitor selected", Style::default().fg(HINT)));
    };
    let mut text = format!(
        "Details: {}  pos {},{}  size {}x{} @{:.0}Hz  scale {:.2}",
        mon.name, mon.x, mon.y, mon.width, mon.height, mon.refresh_rate, mon.scale
    );
    if let Some(src) = &mon.mirror_source {
        text.push_str(&format!("  mirror of {src}"));
    }
    if mon.transform.index() != 0 {
        text.push_str(&format!("  transform {}", mon.transform.label()));
    }
    Line::from(text)
}

/// Canvas frame including its border; the inner area starts at the canvas origin
pub fn canvas_block_area(session: &Session, area: Rect) -> Rect {
    let width = (session.world.usable_width() as u16).saturating_add(2);
    let height = (session.world.usable_height() as u16).saturating_add(2);
    Rect::new(area.x, area.y + 1, width, height).intersection(area)
}

pub fn draw(frame: &mut Frame, session: &Session) {
    let area = frame.area();
    frame.render_widget(Paragraph::new(header(session)), Rect { height: 1, ..area });

    let canvas_area = canvas_block_area(session, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(CANVAS_BORDER));
    let inner = block.inner(canvas_area);
    frame.render_widget(block, canvas_area);
    if session.monitors.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(&session.status, Style::default().fg(HINT))),
            inner,
        );
    } else {
        canvas::render(frame, inner, session);
    }

    let below = canvas_area.bottom();
    let remaining = area.bottom().saturating_sub(below);
    if remaining > 0 {
        let rows = Rect::new(area.x, below, area.width, remaining);
        let mut lines = vec![
            details(session),
            Line::from(Span::styled(session.status.clone(), Style::default().fg(STATUS))),
        ];
        lines.push(Line::from(Span::styled(FOOTER, Style::default().fg(HINT))));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows);
    }

    match &session.overlay {
        Overlay::None => {}
        Overlay::Help(state) => components::help::render(frame, area, state),
        Overlay::ScalePicker(state) => components::scale_picker::render(frame, area, state),
        Overlay::ModePicker(state) => components::mode_picker::render(frame, area, state),
        Overlay::MirrorPicker(state) => components::mirror_picker::render(frame, area, state),
        Overlay::AdvancedSettings(state) => components::advanced_settings::render(frame, area, state),
        Overlay::ProfileInput(state) => components::profile_input::render(frame, area, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::constants::layout;
    use crate::types::Monitor;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_canvas_inner_area_matches_mouse_origin() {
        let session = Session::new(&Settings::default(), 80, 24);
        let outer = canvas_block_area(&session, Rect::new(0, 0, 80, 24));
        let inner = Block::default().borders(Borders::ALL).inner(outer);
        assert_eq!(inner.x, layout::CANVAS_ORIGIN_COL);
        assert_eq!(inner.y, layout::CANVAS_ORIGIN_ROW);
        assert_eq!(inner.width as i32, session.world.usable_width());
        assert_eq!(inner.height as i32, session.world.usable_height());
    }

    #[test]
    fn test_draw_shows_header_and_details() {
        let mut session = Session::new(&Settings::default(), 80, 24);
        session.load_monitors(vec![Monitor::new("DP-1", 1920, 1080, 60.0)]);
        session.profile_name = Some("desk".to_string());

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &session)).unwrap();
        let buffer = terminal.backend().buffer();

        let row = |y: u16| -> String { (0..80).map(|x| buffer[(x, y)].symbol().to_string()).collect() };
        assert!(row(0).contains("Grid: 32 px"));
        assert!(row(0).contains("Profile: desk"));
        // Canvas block spans rows 1..=16
        assert!(row(17).starts_with("Details: DP-1  pos 0,0"));
        assert!(row(18).starts_with("Loaded 1 monitors"));
    }

    #[test]
    fn test_draw_with_overlay_does_not_panic_on_small_terminal() {
        let mut session = Session::new(&Settings::default(), 20, 8);
        session.load_monitors(vec![Monitor::new("DP-1", 1920, 1080, 60.0)]);
        session.open_help();
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        terminal.draw(|frame| draw(frame, &session)).unwrap();

        session.open_advanced_settings();
        terminal.draw(|frame| draw(frame, &session)).unwrap();
    }
}
