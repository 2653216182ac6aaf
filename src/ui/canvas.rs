//! Monitor layout canvas drawn straight into the frame buffer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::border;
use ratatui::Frame;

use super::constants::{ACTIVE, GUIDE, INACTIVE, INACTIVE_FILL, SELECTED};
use crate::geometry::monitor_rect;
use crate::session::Session;
use crate::snapping::Guide;
use crate::types::Monitor;
use crate::viewport::World;

const MIN_BOX_COLS: i32 = 3;
const MIN_BOX_ROWS: i32 = 2;

/// Canvas-local painter that drops anything outside `area`
struct Painter<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl Painter<'_> {
    fn cols(&self) -> i32 {
        i32::from(self.area.width)
    }

    fn rows(&self) -> i32 {
        i32::from(self.area.height)
    }

    fn put(&mut self, col: i32, row: i32, symbol: &str, style: Style) {
        if col < 0 || row < 0 || col >= self.cols() || row >= self.rows() {
            return;
        }
        let pos = (self.area.x + col as u16, self.area.y + row as u16);
        if let Some(cell) = self.buf.cell_mut(pos) {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    /// Write `text` from `col`, stopping before `limit`
    fn text(&mut self, col: i32, row: i32, limit: i32, text: &str, style: Style) {
        let mut tmp = [0u8; 4];
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i32;
            if c >= limit {
                break;
            }
            self.put(c, row, ch.encode_utf8(&mut tmp), style);
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    paint(frame.buffer_mut(), area, session);
}

pub fn paint(buf: &mut Buffer, area: Rect, session: &Session) {
    let mut painter = Painter { buf, area };

    for guide in &session.guides {
        paint_guide(&mut painter, &session.world, *guide);
    }
    for (i, mon) in session.monitors.iter().enumerate() {
        paint_monitor(&mut painter, &session.world, mon, session.selected == Some(i));
    }
}

fn paint_guide(painter: &mut Painter, world: &World, guide: Guide) {
    let style = Style::default().fg(GUIDE);
    match guide {
        Guide::Vertical(x) => {
            let (col, _) = world.world_to_term(x, 0);
            for row in 0..painter.rows() {
                painter.put(col, row, "│", style);
            }
        }
        Guide::Horizontal(y) => {
            let (_, row) = world.world_to_term(0, y);
            for col in 0..painter.cols() {
                painter.put(col, row, "─", style);
            }
        }
    }
}

fn paint_monitor(painter: &mut Painter, world: &World, mon: &Monitor, selected: bool) {
    let rect = monitor_rect(mon);
    let (mut x1, mut y1) = world.world_to_term(rect.left(), rect.top());
    let (mut x2, mut y2) = world.world_to_term(rect.right(), rect.bottom());

    x1 = x1.max(0);
    y1 = y1.max(0);
    x2 = x2.min(painter.cols() - 1);
    y2 = y2.min(painter.rows() - 1);
    if x2 - x1 < MIN_BOX_COLS {
        x2 = x1 + MIN_BOX_COLS;
    }
    if y2 - y1 < MIN_BOX_ROWS {
        y2 = y1 + MIN_BOX_ROWS;
    }

    let (set, color) = if selected {
        (border::DOUBLE, SELECTED)
    } else if mon.active {
        (border::ROUNDED, ACTIVE)
    } else {
        (border::PLAIN, INACTIVE)
    };
    let mut style = Style::default().fg(color);
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }

    if !mon.active {
        let mut fill = [0u8; 4];
        let fill = INACTIVE_FILL.encode_utf8(&mut fill);
        for row in y1 + 1..y2 {
            for col in x1 + 1..x2 {
                painter.put(col, row, fill, style);
            }
        }
    }

    for col in x1 + 1..x2 {
        painter.put(col, y1, set.horizontal_top, style);
        painter.put(col, y2, set.horizontal_bottom, style);
    }
    for row in y1 + 1..y2 {
        painter.put(x1, row, set.vertical_left, style);
        painter.put(x2, row, set.vertical_right, style);
    }
    painter.put(x1, y1, set.top_left, style);
    painter.put(x2, y1, set.top_right, style);
    painter.put(x1, y2, set.bottom_left, style);
    painter.put(x2, y2, set.bottom_right, style);

    let status = if mon.active { "[ON]" } else { "[OFF]" };
    painter.text(x1 + 1, y1 + 1, x2, &format!("{} {status}", mon.name), style);

    if !mon.active {
        return;
    }
    let mut labels = vec![mon.mode_label(), format!("x{:.2}", mon.scale)];
    if let Some(src) = &mon.mirror_source {
        labels.push(format!("⇄ {src}"));
    }
    for (i, label) in labels.iter().enumerate() {
        let row = y1 + 2 + i as i32;
        if row >= y2 {
            break;
        }
        painter.text(x1 + 1, row, x2, label, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn canvas_area(session: &Session) -> Rect {
        Rect::new(
            0,
            0,
            session.world.usable_width() as u16,
            session.world.usable_height() as u16,
        )
    }

    fn painted(session: &Session) -> Buffer {
        let area = canvas_area(session);
        let mut buf = Buffer::empty(area);
        paint(&mut buf, area, session);
        buf
    }

    fn row_text(buf: &Buffer, row: u16, from: u16, len: u16) -> String {
        (from..from + len).map(|x| buf[(x, row)].symbol().to_string()).collect()
    }

    fn session(monitors: Vec<Monitor>) -> Session {
        let mut session = Session::new(&Settings::default(), 80, 24);
        session.load_monitors(monitors);
        session
    }

    #[test]
    fn test_selected_monitor_box_and_labels() {
        let s = session(vec![Monitor::new("DP-1", 1920, 1080, 60.0)]);
        let buf = painted(&s);

        // 1920 * 77 / 2420 = 61, 1080 * 14 / 1580 = 9
        assert_eq!(buf[(0, 0)].symbol(), "╔");
        assert_eq!(buf[(61, 9)].symbol(), "╝");
        assert_eq!(buf[(62, 9)].symbol(), " ");
        assert_eq!(row_text(&buf, 1, 1, 9), "DP-1 [ON]");
        assert_eq!(row_text(&buf, 2, 1, 14), "1920x1080@60Hz");
        assert_eq!(row_text(&buf, 3, 1, 5), "x1.00");
    }

    #[test]
    fn test_inactive_monitor_is_filled() {
        let mut s = session(vec![
            Monitor::new("DP-1", 1920, 1080, 60.0),
            Monitor::new("DP-2", 1920, 1080, 60.0).at(1920, 0).inactive(),
        ]);
        s.selected = Some(0);
        let buf = painted(&s);

        // DP-2 starts at 1920 * 77 / 4340 = 34
        assert_eq!(buf[(34, 0)].symbol(), "┌");
        assert_eq!(row_text(&buf, 1, 35, 10), "DP-2 [OFF]");
        assert_eq!(buf[(40, 3)].symbol(), "·");
    }

    #[test]
    fn test_tiny_monitor_gets_minimum_box() {
        let s = session(vec![
            Monitor::new("DP-1", 7680, 4320, 60.0),
            Monitor::new("DP-2", 20, 20, 60.0).at(7680, 0),
        ]);
        let buf = painted(&s);
        // 7680 * 77 / 8200 = 72
        assert_eq!(buf[(72, 0)].symbol(), "╭");
        assert_eq!(buf[(75, 0)].symbol(), "╮");
        assert_eq!(buf[(75, 2)].symbol(), "╯");
    }

    #[test]
    fn test_guides_are_drawn_under_monitors() {
        let mut s = session(vec![Monitor::new("DP-1", 1920, 1080, 60.0)]);
        s.guides = vec![Guide::Vertical(1920), Guide::Horizontal(1500)];
        let buf = painted(&s);
        // Vertical guide column coincides with the right border
        assert_eq!(buf[(61, 5)].symbol(), "║");
        assert_eq!(buf[(61, 12)].symbol(), "│");
        // 1500 * 14 / 1580 = 13
        assert_eq!(buf[(10, 13)].symbol(), "─");
    }
}
