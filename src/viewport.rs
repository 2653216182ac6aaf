//! World ↔ terminal coordinate mapping, hit-testing and canvas bounds
//!
//! World space is measured in compositor pixels; term space in character
//! cells relative to the top-left cell of the canvas. The map is a plain
//! per-axis scale plus pan offset, computed in integer arithmetic.

use crate::constants::{layout, world};
use crate::geometry::{effective_dimensions, monitor_rect};
use crate::types::Monitor;

/// Shared description of the canvas and the terminal it is drawn on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: i32,
    pub height: i32,
    pub term_width: u16,
    pub term_height: u16,
    pub scale: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            width: world::DEFAULT_WIDTH,
            height: world::DEFAULT_HEIGHT,
            term_width: layout::FALLBACK_TERM_WIDTH,
            term_height: layout::FALLBACK_TERM_HEIGHT,
            scale: world::DEFAULT_SCALE,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl World {
    /// Canvas columns available after the border margin
    pub fn usable_width(&self) -> i32 {
        (i32::from(self.term_width) - layout::BORDER_MARGIN).max(layout::MIN_USABLE_CELLS)
    }

    /// Canvas rows available after header/footer chrome
    pub fn usable_height(&self) -> i32 {
        (i32::from(self.term_height) - layout::FOOTER_RESERVATION).max(layout::MIN_USABLE_CELLS)
    }

    /// Map a world point to the canvas cell containing it
    pub fn world_to_term(&self, x: i32, y: i32) -> (i32, i32) {
        (
            scale_floor(x - self.offset_x, self.usable_width(), self.width),
            scale_floor(y - self.offset_y, self.usable_height(), self.height),
        )
    }

    /// Map a canvas cell back to world space
    ///
    /// Truncates like `world_to_term`, so a round trip can land one cell
    /// short of where it started.
    pub fn term_to_world(&self, col: i32, row: i32) -> (i32, i32) {
        (
            scale_floor(col, self.width, self.usable_width()) + self.offset_x,
            scale_floor(row, self.height, self.usable_height()) + self.offset_y,
        )
    }

    pub fn set_terminal_size(&mut self, columns: u16, rows: u16) {
        self.term_width = columns;
        self.term_height = rows;
    }

    /// Recompute canvas bounds for `monitors`, keeping the terminal fields
    pub fn recompute(&mut self, monitors: &[Monitor]) {
        let bounds = update_world(monitors);
        self.width = bounds.width;
        self.height = bounds.height;
        self.scale = bounds.scale;
        self.offset_x = bounds.offset_x;
        self.offset_y = bounds.offset_y;
    }
}

fn scale_floor(value: i32, numerator: i32, denominator: i32) -> i32 {
    let denominator = i64::from(denominator.max(1));
    (i64::from(value) * i64::from(numerator)).div_euclid(denominator) as i32
}

/// Canvas extents for a monitor set
///
/// Empty sets get the default canvas. Otherwise each axis is the furthest
/// `position + effective dimension` (never below zero) plus padding. Terminal
/// fields are left at their defaults; use [`World::recompute`] to keep them.
pub fn update_world(monitors: &[Monitor]) -> World {
    if monitors.is_empty() {
        return World::default();
    }

    let (max_x, max_y) = monitors.iter().fold((0, 0), |(max_x, max_y), mon| {
        let (w, h) = effective_dimensions(mon);
        (max_x.max(mon.x + w), max_y.max(mon.y + h))
    });

    World {
        width: max_x + world::PADDING_PX,
        height: max_y + world::PADDING_PX,
        scale: world::DEFAULT_SCALE,
        ..World::default()
    }
}

/// Index of the first monitor (list order) under a canvas cell
pub fn hit_test(world: &World, monitors: &[Monitor], col: i32, row: i32) -> Option<usize> {
    let (wx, wy) = world.term_to_world(col, row);
    monitors
        .iter()
        .position(|mon| monitor_rect(mon).contains(wx, wy))
}
