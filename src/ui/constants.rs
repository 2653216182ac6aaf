//! TUI-specific constants for colors and dialog sizes

use ratatui::style::Color;

/// Canvas box colors
pub const SELECTED: Color = Color::Indexed(214);
pub const ACTIVE: Color = Color::Indexed(42);
pub const INACTIVE: Color = Color::Indexed(244);
pub const GUIDE: Color = Color::Indexed(33);
pub const CANVAS_BORDER: Color = Color::Indexed(240);

/// Text colors
pub const TITLE: Color = Color::Indexed(12);
pub const STATUS: Color = Color::Indexed(214);
pub const HINT: Color = Color::Indexed(241);
pub const WARNING: Color = Color::Indexed(208);
pub const ERROR: Color = Color::Red;

/// Fill for inactive monitors
pub const INACTIVE_FILL: char = '·';

/// Dialog dimensions
pub const DIALOG_WIDTH: u16 = 64;
pub const ADVANCED_DIALOG_HEIGHT: u16 = 14;
pub const INPUT_DIALOG_HEIGHT: u16 = 9;

/// Rows of the help dialog used by borders, title and footer
pub const HELP_CHROME_ROWS: u16 = 4;
