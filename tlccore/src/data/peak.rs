use serde::{Deserialize, Serialize};

use crate::data::geometry::{AxisPoint, PeakLimits};

/// Apex of a finalized peak.
///
/// `maximum` is the highest profile sample inside the limits; `height` shares its
/// abscissa but measures the ordinate from the peak's own baseline chord.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakApex {
    pub maximum: AxisPoint,
    pub height: AxisPoint,
}

/// One chromatographic band within a sample.
///
/// Everything after `limits` is derived data written by the integration engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Dense position in the owning sample's peak list, reassigned on insert.
    pub id: usize,
    pub name: String,
    /// Index into the sample mean.
    pub position: usize,
    pub limits: Option<PeakLimits>,
    /// Baseline chord endpoints; empty for zero-width or not yet integrated peaks.
    pub baseline: Vec<AxisPoint>,
    pub surface: Option<f64>,
    /// Percentage of the sample's total surface.
    pub relative_surface: Option<f64>,
    pub apex: Option<PeakApex>,
}

impl Peak {
    pub fn new(name: impl Into<String>) -> Self {
        Peak {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_limits(name: impl Into<String>, limits: PeakLimits) -> Self {
        Peak {
            name: name.into(),
            limits: Some(limits),
            ..Default::default()
        }
    }

    pub fn maximum(&self) -> Option<AxisPoint> {
        self.apex.map(|apex| apex.maximum)
    }

    pub fn height(&self) -> Option<AxisPoint> {
        self.apex.map(|apex| apex.height)
    }

    /// Drops every value the integration engine computed.
    pub fn reset_derived(&mut self) {
        self.baseline.clear();
        self.surface = None;
        self.relative_surface = None;
        self.apex = None;
    }

    pub fn is_integrated(&self) -> bool {
        self.surface.is_some()
    }
}
