use serde::{Deserialize, Serialize};

use crate::geometry::{monitor_rect, Rect};
use crate::types::Monitor;

/// Which alignment rules the resolver applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    Off,
    #[default]
    Edges,
    Centers,
    Both,
}

impl SnapMode {
    pub fn next(self) -> Self {
        match self {
            SnapMode::Off => SnapMode::Edges,
            SnapMode::Edges => SnapMode::Centers,
            SnapMode::Centers => SnapMode::Both,
            SnapMode::Both => SnapMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnapMode::Off => "Off",
            SnapMode::Edges => "Edges",
            SnapMode::Centers => "Centers",
            SnapMode::Both => "Both",
        }
    }

    fn edges(self) -> bool {
        matches!(self, SnapMode::Edges | SnapMode::Both)
    }

    fn centers(self) -> bool {
        matches!(self, SnapMode::Centers | SnapMode::Both)
    }
}

/// Alignment line drawn while snapping, at a world coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guide {
    Vertical(i32),
    Horizontal(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapResult {
    pub x: i32,
    pub y: i32,
    pub guides: Vec<Guide>,
}

/// Resolve a proposed top-left for `monitors[moving]` against every other
/// active monitor and the world origin
///
/// Each axis is resolved independently. Rules are evaluated in a fixed order
/// and every match overwrites the axis: within one target the last matching
/// edge rule wins, and across targets the later monitor in list order wins.
/// Candidates are always measured from the proposed position, so an earlier
/// snap never feeds a later comparison. Each firing rule appends one guide.
pub fn snap_position(
    monitors: &[Monitor],
    moving: usize,
    proposed_x: i32,
    proposed_y: i32,
    mode: SnapMode,
    threshold: i32,
) -> SnapResult {
    let mut result = SnapResult {
        x: proposed_x,
        y: proposed_y,
        guides: Vec::new(),
    };

    if mode == SnapMode::Off {
        return result;
    }
    let Some(mon) = monitors.get(moving) else {
        return result;
    };

    let dragged = Rect {
        x: proposed_x,
        y: proposed_y,
        ..monitor_rect(mon)
    };

    let targets = monitors
        .iter()
        .enumerate()
        .filter(|&(i, m)| i != moving && m.active)
        .map(|(_, m)| monitor_rect(m));

    for other in targets {

        if mode.edges() {
            // Left edge to other's right edge
            if near(dragged.left(), other.right(), threshold) {
                result.x = other.right();
                result.guides.push(Guide::Vertical(result.x));
            }
            // Right edge to other's left edge
            if near(dragged.right(), other.left(), threshold) {
                result.x = other.left() - dragged.width;
                result.guides.push(Guide::Vertical(other.left()));
            }
            // Align left edges
            if near(dragged.left(), other.left(), threshold) {
                result.x = other.left();
                result.guides.push(Guide::Vertical(result.x));
            }

            // Top edge to other's bottom edge
            if near(dragged.top(), other.bottom(), threshold) {
                result.y = other.bottom();
                result.guides.push(Guide::Horizontal(result.y));
            }
            // Bottom edge to other's top edge
            if near(dragged.bottom(), other.top(), threshold) {
                result.y = other.top() - dragged.height;
                result.guides.push(Guide::Horizontal(other.top()));
            }
            // Align top edges
            if near(dragged.top(), other.top(), threshold) {
                result.y = other.top();
                result.guides.push(Guide::Horizontal(result.y));
            }
        }

        if mode.centers() {
            if near(dragged.center_x(), other.center_x(), threshold) {
                result.x = other.center_x() - dragged.width / 2;
                result.guides.push(Guide::Vertical(other.center_x()));
            }
            if near(dragged.center_y(), other.center_y(), threshold) {
                result.y = other.center_y() - dragged.height / 2;
                result.guides.push(Guide::Horizontal(other.center_y()));
            }
        }
    }

    // World origin
    if near(proposed_x, 0, threshold) {
        result.x = 0;
        result.guides.push(Guide::Vertical(0));
    }
    if near(proposed_y, 0, threshold) {
        result.y = 0;
        result.guides.push(Guide::Horizontal(0));
    }

    result
}

fn near(edge: i32, target: i32, threshold: i32) -> bool {
    (edge - target).abs() < threshold
}
