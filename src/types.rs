//! Monitor data model shared by the layout engine, the compositor bridge and
//! the profile store.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output rotation/flip as encoded by Hyprland (`transform,N`)
///
/// Odd values are quarter turns; their on-canvas footprint swaps width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Transform {
    #[default]
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
    Flipped,
    Flipped90,
    Flipped180,
    Flipped270,
}

impl Transform {
    const ALL: [Transform; 8] = [
        Transform::Normal,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::Flipped,
        Transform::Flipped90,
        Transform::Flipped180,
        Transform::Flipped270,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// True for 90° and 270° variants (flipped or not)
    pub fn is_quarter_turn(self) -> bool {
        self.index() % 2 == 1
    }

    /// Next transform in compositor order, wrapping after Flipped270
    pub fn next(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Transform::Normal => "Normal",
            Transform::Rotate90 => "90°",
            Transform::Rotate180 => "180°",
            Transform::Rotate270 => "270°",
            Transform::Flipped => "Flipped",
            Transform::Flipped90 => "Flipped + 90°",
            Transform::Flipped180 => "Flipped + 180°",
            Transform::Flipped270 => "Flipped + 270°",
        }
    }
}

impl From<Transform> for u8 {
    fn from(value: Transform) -> Self {
        value.index()
    }
}

impl TryFrom<u8> for Transform {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("transform must be in 0..=7, got {value}"))
    }
}

/// Colour management preset (`cm,<mode>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    #[default]
    Srgb,
    Wide,
    Edid,
    Hdr,
    HdrEdid,
}

impl ColorMode {
    const ALL: [ColorMode; 6] = [
        ColorMode::Auto,
        ColorMode::Srgb,
        ColorMode::Wide,
        ColorMode::Edid,
        ColorMode::Hdr,
        ColorMode::HdrEdid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::Srgb => "srgb",
            ColorMode::Wide => "wide",
            ColorMode::Edid => "edid",
            ColorMode::Hdr => "hdr",
            ColorMode::HdrEdid => "hdredid",
        }
    }

    /// SDR brightness/saturation only apply in HDR modes
    pub fn is_hdr(self) -> bool {
        matches!(self, ColorMode::Hdr | ColorMode::HdrEdid)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Variable refresh rate setting (`vrr,N`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vrr {
    #[default]
    Off,
    On,
    Fullscreen,
}

impl Vrr {
    pub fn index(self) -> u8 {
        match self {
            Vrr::Off => 0,
            Vrr::On => 1,
            Vrr::Fullscreen => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Vrr::Off => Vrr::On,
            Vrr::On => Vrr::Fullscreen,
            Vrr::Fullscreen => Vrr::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Vrr::Off => "Off",
            Vrr::On => "On",
            Vrr::Fullscreen => "Fullscreen only",
        }
    }
}

/// A display mode advertised by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f32,
}

impl Mode {
    pub fn new(width: u32, height: u32, refresh_rate: f32) -> Self {
        Self { width, height, refresh_rate }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{:.2}Hz", self.width, self.height, self.refresh_rate)
    }
}

/// Parses hyprctl's `availableModes` entries, e.g. `1920x1080@143.98Hz`
impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (resolution, rate) = s
            .split_once('@')
            .ok_or_else(|| anyhow!("mode '{s}' has no refresh rate"))?;
        let (width, height) = resolution
            .split_once('x')
            .ok_or_else(|| anyhow!("mode '{s}' has no WxH resolution"))?;
        let rate = rate.trim_end_matches("Hz");
        Ok(Self {
            width: width.parse().map_err(|e| anyhow!("bad width in mode '{s}': {e}"))?,
            height: height.parse().map_err(|e| anyhow!("bad height in mode '{s}': {e}"))?,
            refresh_rate: rate.parse().map_err(|e| anyhow!("bad refresh rate in mode '{s}': {e}"))?,
        })
    }
}

/// Grab offset recorded when a drag gesture starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub offset_x: i32,
    pub offset_y: i32,
}

/// One output's configuration
///
/// Invariants: `width`, `height` > 0 and `scale` > 0. Rotation is carried by
/// `transform`; the stored pixel size is never swapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f32,
    pub scale: f32,
    pub x: i32,
    pub y: i32,
    pub active: bool,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<Mode>,

    // Advanced display settings
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u8,
    #[serde(default)]
    pub color_mode: ColorMode,
    #[serde(default = "default_sdr_level")]
    pub sdr_brightness: f32,
    #[serde(default = "default_sdr_level")]
    pub sdr_saturation: f32,
    #[serde(default)]
    pub vrr: Vrr,

    /// Set only while a drag gesture is in progress
    #[serde(skip)]
    pub drag: Option<DragState>,
}

fn default_bit_depth() -> u8 {
    8
}

fn default_sdr_level() -> f32 {
    1.0
}

impl Monitor {
    /// Active, unrotated 1.0-scale monitor with default advanced settings
    pub fn new(name: impl Into<String>, width: u32, height: u32, refresh_rate: f32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            width,
            height,
            refresh_rate,
            scale: 1.0,
            x: 0,
            y: 0,
            active: true,
            transform: Transform::Normal,
            mirror_source: None,
            modes: Vec::new(),
            bit_depth: default_bit_depth(),
            color_mode: ColorMode::default(),
            sdr_brightness: default_sdr_level(),
            sdr_saturation: default_sdr_level(),
            vrr: Vrr::default(),
            drag: None,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror_source.is_some()
    }

    pub fn mode_label(&self) -> String {
        format!("{}x{}@{:.0}Hz", self.width, self.height, self.refresh_rate)
    }
}

/// Monitor names end up in compositor commands and config lines
pub fn is_valid_monitor_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
