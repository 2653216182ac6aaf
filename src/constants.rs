//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// World (monitor layout) space constants
pub mod world {
    /// Canvas width used when no monitors are known
    pub const DEFAULT_WIDTH: i32 = 3840;

    /// Canvas height used when no monitors are known
    pub const DEFAULT_HEIGHT: i32 = 2160;

    /// World scale, reset on every bounds recomputation
    pub const DEFAULT_SCALE: f32 = 1.0;

    /// Padding added to the right and bottom of the monitor bounding box
    pub const PADDING_PX: i32 = 500;
}

/// Terminal layout constants
pub mod layout {
    /// Columns outside the canvas: border (2) + margin (1)
    pub const BORDER_MARGIN: i32 = 3;

    /// Rows reserved for header, details, status and footer
    pub const FOOTER_RESERVATION: i32 = 10;

    /// Smallest usable canvas dimension, guards the world/term divisions
    pub const MIN_USABLE_CELLS: i32 = 1;

    /// Terminal column of the first canvas cell (inside the left border)
    pub const CANVAS_ORIGIN_COL: u16 = 1;

    /// Terminal row of the first canvas cell (header + top border)
    pub const CANVAS_ORIGIN_ROW: u16 = 2;

    /// Fallback terminal size when the real size is unavailable
    pub const FALLBACK_TERM_WIDTH: u16 = 80;
    pub const FALLBACK_TERM_HEIGHT: u16 = 24;

    /// Event poll interval for the terminal loop
    pub const POLL_INTERVAL_MS: u64 = 100;
}

/// Editing constants
pub mod editing {
    /// Grid sizes cycled with `g`
    pub const GRID_SIZES: [i32; 5] = [1, 8, 16, 32, 64];

    /// Nudge multiplier when shift is held
    pub const LARGE_STEP_MULTIPLIER: i32 = 10;

    /// Scale change per mouse wheel step
    pub const WHEEL_SCALE_STEP: f32 = 0.05;

    pub const MIN_SCALE: f32 = 0.5;
    pub const MAX_SCALE: f32 = 3.0;

    /// Scale factors offered by the scale picker
    pub const COMMON_SCALES: [f32; 15] = [
        0.50, 0.75, 0.90, 1.00, 1.10, 1.25, 1.33, 1.50, 1.66, 1.75, 2.00, 2.25, 2.50, 2.75, 3.00,
    ];

    /// Index of 1.00 in COMMON_SCALES
    pub const DEFAULT_SCALE_INDEX: usize = 3;

    pub const SDR_BRIGHTNESS_RANGE: (f32, f32) = (0.5, 2.0);
    pub const SDR_SATURATION_RANGE: (f32, f32) = (0.5, 1.5);
    pub const SDR_STEP: f32 = 0.1;

    /// Refresh rate tolerance when matching the current mode
    pub const REFRESH_MATCH_TOLERANCE: f32 = 0.1;
}

/// hyprctl invocation constants
pub mod hyprctl {
    pub const BINARY: &str = "hyprctl";

    /// Per-invocation timeout in seconds
    pub const TIMEOUT_SECS: u64 = 5;

    /// Interval between child exit polls in milliseconds
    pub const POLL_INTERVAL_MS: u64 = 10;

    /// Value of `mirrorOf` for monitors that do not mirror
    pub const NO_MIRROR: &str = "none";
}

/// Hyprland config file constants
pub mod hypr_config {
    /// Environment variable overriding the config path
    pub const PATH_ENV: &str = "HYPRLAND_CONFIG";

    /// Config path relative to the home directory
    pub const DEFAULT_RELATIVE_PATH: &str = ".config/hypr/hyprland.conf";

    pub const MONITOR_KEY: &str = "monitor";
}

/// Application config constants
pub mod config {
    /// Directory under the XDG config dir
    pub const APP_DIR: &str = "hyprmon";

    /// Settings file name
    pub const SETTINGS_FILENAME: &str = "settings.toml";

    /// Profile subdirectory name
    pub const PROFILES_DIR: &str = "profiles";

    /// Profile file extension
    pub const PROFILE_EXTENSION: &str = "json";

    /// Custom profile ordering file
    pub const PROFILE_ORDER_FILE: &str = ".profile_order";

    /// Log file name under the XDG cache dir
    pub const LOG_FILENAME: &str = "hyprmon.log";

    /// Environment variable selecting the log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

    pub const GRID_PX_ENV: &str = "HYPRMON_GRID_PX";
    pub const SNAP_THRESHOLD_ENV: &str = "HYPRMON_SNAP_THRESHOLD";
}

/// Validation limits for settings
pub mod validation {
    pub const MIN_SNAP_THRESHOLD: i32 = 1;
    pub const MAX_SNAP_THRESHOLD: i32 = 500;
}
