use std::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};

/// A point in data space: abscissa along the lane, ordinate as intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisPoint {
    pub x: f64,
    pub y: f64,
}

impl AxisPoint {
    pub fn new(x: f64, y: f64) -> Self {
        AxisPoint { x, y }
    }
}

impl From<(f64, f64)> for AxisPoint {
    fn from((x, y): (f64, f64)) -> Self {
        AxisPoint { x, y }
    }
}

impl Display for AxisPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer pixel offset on a plate or lane image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        PixelPoint { x, y }
    }
}

/// Two corner points bounding a region of an image, in the order they were picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRegion {
    pub start: PixelPoint,
    pub end: PixelPoint,
}

impl PixelRegion {
    pub fn new(start: PixelPoint, end: PixelPoint) -> Self {
        PixelRegion { start, end }
    }

    pub fn width(&self) -> u32 {
        self.start.x.abs_diff(self.end.x)
    }

    pub fn height(&self) -> u32 {
        self.start.y.abs_diff(self.end.y)
    }
}

/// Start and end abscissa of a peak, in the same units as the profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakLimits {
    pub start: f64,
    pub end: f64,
}

impl PeakLimits {
    pub fn new(start: f64, end: f64) -> Self {
        PeakLimits { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }
}

impl Display for PeakLimits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
