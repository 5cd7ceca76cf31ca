use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use tlccore::error::{TlcError, TlcResult};

use crate::axis::{DEFAULT_TARGET_TICKS, Y_TICKS_INTERVAL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }
}

impl From<RgbColor> for RGBColor {
    fn from(color: RgbColor) -> Self {
        RGBColor(color.r, color.g, color.b)
    }
}

/// Curve colors handed out in order before falling back to seeded random colors.
pub const DEFAULT_PALETTE: [RgbColor; 8] = [
    RgbColor::new(31, 119, 180),  // blue
    RgbColor::new(214, 39, 40),   // red
    RgbColor::new(44, 160, 44),   // green
    RgbColor::new(255, 127, 14),  // orange
    RgbColor::new(148, 103, 189), // purple
    RgbColor::new(140, 86, 75),   // brown
    RgbColor::new(227, 119, 194), // pink
    RgbColor::new(23, 190, 207),  // cyan
];

/// Pixel margins around the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: u32,
    pub top: u32,
    pub bottom: u32,
    pub right: u32,
    /// Right margin used instead of `right` when the legend is shown
    pub legend_right: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            left: 70,
            top: 30,
            bottom: 55,
            right: 20,
            legend_right: 170,
        }
    }
}

/// Renderer settings. Every field has a default, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Interactive canvas width (default: 800)
    pub width: u32,
    /// Interactive canvas height (default: 500)
    pub height: u32,
    pub margins: Margins,
    pub paint_background: bool,
    /// Fill each curve down to its own minimum
    pub fill_curves: bool,
    pub fill_integration_area: bool,
    pub draw_baseline: bool,
    pub draw_peak_markers: bool,
    /// Target number of major intervals on the x axis (default: 10)
    pub x_target_ticks: usize,
    /// Target number of major intervals on the y axis (default: 10)
    pub y_target_ticks: usize,
    /// Minor steps per major interval (default: 4)
    pub minor_ticks_per_major: usize,
    /// Fraction added above the data maximum (default: 0.08)
    pub y_headroom: f64,
    pub x_axis_name: String,
    pub y_axis_name: String,
    pub font_family: String,
    pub font_size: u32,
    /// Longest legend name before truncation
    pub legend_name_chars: usize,
    pub curve_fill_alpha: f64,
    pub integration_alpha: f64,
    pub background: RgbColor,
    pub major_grid: RgbColor,
    pub minor_grid: RgbColor,
    pub axis: RgbColor,
    pub baseline: RgbColor,
    pub integration: RgbColor,
    pub marker: RgbColor,
    pub palette: Vec<RgbColor>,
    /// Seed for colors of curves beyond the palette
    pub color_seed: u64,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        PlotterConfig {
            width: 800,
            height: 500,
            margins: Margins::default(),
            paint_background: true,
            fill_curves: false,
            fill_integration_area: true,
            draw_baseline: true,
            draw_peak_markers: true,
            x_target_ticks: DEFAULT_TARGET_TICKS,
            y_target_ticks: DEFAULT_TARGET_TICKS,
            minor_ticks_per_major: Y_TICKS_INTERVAL,
            y_headroom: 0.08,
            x_axis_name: "Distance".to_string(),
            y_axis_name: "Intensity".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            legend_name_chars: 16,
            curve_fill_alpha: 0.25,
            integration_alpha: 0.45,
            background: RgbColor::new(255, 255, 255),
            major_grid: RgbColor::new(200, 200, 200),
            minor_grid: RgbColor::new(235, 235, 235),
            axis: RgbColor::new(0, 0, 0),
            baseline: RgbColor::new(90, 90, 90),
            integration: RgbColor::new(255, 165, 0),
            marker: RgbColor::new(200, 0, 0),
            palette: DEFAULT_PALETTE.to_vec(),
            color_seed: 0x7c_5eed,
        }
    }
}

impl PlotterConfig {
    pub fn from_json_str(json: &str) -> TlcResult<Self> {
        serde_json::from_str(json).map_err(|err| TlcError::Config(err.to_string()))
    }

    pub fn to_json_string(&self) -> TlcResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| TlcError::Config(err.to_string()))
    }

    /// Right margin, widened when a legend is drawn.
    pub fn right_margin(&self, with_legend: bool) -> u32 {
        if with_legend {
            self.margins.legend_right
        } else {
            self.margins.right
        }
    }
}
