//! Rectangles and rotation-aware monitor footprints in world space

use crate::types::Monitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Half-open containment: left/top inclusive, right/bottom exclusive
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }
}

/// Width and height a monitor occupies in world space
///
/// Pixel size is divided by scale (floored) and swapped for quarter-turn
/// transforms. Everything that needs a monitor's footprint goes through here.
pub fn effective_dimensions(monitor: &Monitor) -> (i32, i32) {
    let scale = f64::from(monitor.scale);
    let scaled_w = (f64::from(monitor.width) / scale).floor() as i32;
    let scaled_h = (f64::from(monitor.height) / scale).floor() as i32;

    if monitor.transform.is_quarter_turn() {
        (scaled_h, scaled_w)
    } else {
        (scaled_w, scaled_h)
    }
}

/// World-space footprint of a monitor at its stored position
pub fn monitor_rect(monitor: &Monitor) -> Rect {
    let (width, height) = effective_dimensions(monitor);
    Rect::new(monitor.x, monitor.y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transform;

    fn monitor(scale: f32, transform: Transform) -> Monitor {
        Monitor::new("DP-1", 1920, 1080, 60.0)
            .with_scale(scale)
            .with_transform(transform)
    }

    #[test]
    fn test_effective_dimensions_unrotated() {
        for transform in [Transform::Normal, Transform::Rotate180, Transform::Flipped, Transform::Flipped180] {
            assert_eq!(effective_dimensions(&monitor(1.0, transform)), (1920, 1080));
        }
    }

    #[test]
    fn test_effective_dimensions_quarter_turns_swap() {
        for transform in [Transform::Rotate90, Transform::Rotate270, Transform::Flipped90, Transform::Flipped270] {
            assert_eq!(effective_dimensions(&monitor(1.0, transform)), (1080, 1920));
        }
    }

    #[test]
    fn test_effective_dimensions_scaled() {
        assert_eq!(effective_dimensions(&monitor(2.0, Transform::Normal)), (960, 540));
        assert_eq!(effective_dimensions(&monitor(2.0, Transform::Rotate90)), (540, 960));
    }

    #[test]
    fn test_effective_dimensions_floor_fractional_scale() {
        // 2560 / 1.5 = 1706.67, 1440 / 1.5 = 960
        let mon = Monitor::new("DP-2", 2560, 1440, 144.0).with_scale(1.5);
        assert_eq!(effective_dimensions(&mon), (1706, 960));
    }

    #[test]
    fn test_rect_edges_and_centers() {
        let rect = Rect::new(100, 50, 300, 201);
        assert_eq!(rect.right(), 400);
        assert_eq!(rect.bottom(), 251);
        assert_eq!(rect.center_x(), 250);
        assert_eq!(rect.center_y(), 150);
    }

    #[test]
    fn test_rect_contains_half_open() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(9, 9));
        assert!(!rect.contains(10, 5));
        assert!(!rect.contains(5, 10));
        assert!(!rect.contains(-1, 0));
    }

    #[test]
    fn test_monitor_rect_uses_position() {
        let mon = monitor(1.0, Transform::Rotate90).at(2000, 100);
        assert_eq!(monitor_rect(&mon), Rect::new(2000, 100, 1080, 1920));
    }
}
