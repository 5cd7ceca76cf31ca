//! Axis spacing with "nice numbers".
//!
//! Spacings are restricted to {1, 2, 5, 10} × 10^n so gridlines land on round values.
//! Tick positions are accumulated with a compensated sum and snapped to the spacing's
//! decimal precision, so long axes do not drift.

use tracing::debug;

/// Default number of major intervals per axis.
pub const DEFAULT_TARGET_TICKS: usize = 10;
/// Default number of minor steps per major interval.
pub const Y_TICKS_INTERVAL: usize = 4;
/// Upper bound on generated ticks per axis.
const MAX_TICKS: usize = 10_000;

/// Rounding rule for [`nice_number`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NiceMode {
    /// Nearest of {1, 2, 5, 10}; used for gridlines.
    Round,
    /// Smallest of {1, 2, 5, 10} not below the fraction; never returns less than the input.
    Ceiling,
}

/// Rounds `x` to a value of the form f × 10^e with f ∈ {1, 2, 5, 10}.
///
/// Returns 0 for non-positive or non-finite input.
///
/// # Example
///
/// ```rust
/// # use tlcplot::axis::{nice_number, NiceMode};
/// assert_eq!(nice_number(3.7, NiceMode::Round), 5.0);
/// assert_eq!(nice_number(1.2, NiceMode::Ceiling), 2.0);
/// ```
pub fn nice_number(x: f64, mode: NiceMode) -> f64 {
    if !(x > 0.0) || !x.is_finite() {
        return 0.0;
    }
    let mut exponent = x.log10().floor() as i32;
    let mut fraction = x / 10f64.powi(exponent);
    // log10 can land one decade off near exact powers of ten
    if fraction >= 10.0 {
        exponent += 1;
        fraction /= 10.0;
    } else if fraction < 1.0 {
        exponent -= 1;
        fraction *= 10.0;
    }

    let nice_fraction = match mode {
        NiceMode::Round => {
            if fraction < 1.5 {
                1.0
            } else if fraction < 3.0 {
                2.0
            } else if fraction < 7.0 {
                5.0
            } else {
                10.0
            }
        }
        NiceMode::Ceiling => {
            if fraction <= 1.0 {
                1.0
            } else if fraction <= 2.0 {
                2.0
            } else if fraction <= 5.0 {
                5.0
            } else {
                10.0
            }
        }
    };
    nice_fraction * 10f64.powi(exponent)
}

/// Neumaier-compensated running sum.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn new(initial: f64) -> Self {
        CompensatedSum {
            sum: initial,
            compensation: 0.0,
        }
    }

    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Number of decimals needed to represent multiples of `spacing` exactly.
fn decimals_for(spacing: f64) -> i32 {
    ((-spacing.log10().floor()).max(0.0) as i32 + 1).min(15)
}

fn snap(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let snapped = (value * factor).round() / factor;
    if snapped.is_finite() {
        snapped
    } else {
        value
    }
}

/// Every multiple of `spacing` inside `[min, max]`, starting from `min` rounded to the
/// nearest interval boundary.
pub fn tick_positions(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    if !(spacing > 0.0) || !spacing.is_finite() || !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    let decimals = decimals_for(spacing);
    let tolerance = spacing * 1e-9;
    let mut acc = CompensatedSum::new((min / spacing).round() * spacing);
    let mut ticks = Vec::new();

    for _ in 0..MAX_TICKS {
        let value = snap(acc.value(), decimals);
        if value > max + tolerance {
            break;
        }
        if value >= min - tolerance {
            ticks.push(value);
        }
        acc.add(spacing);
    }
    ticks
}

/// Major and minor spacing for one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisTicks {
    pub min: f64,
    pub max: f64,
    pub major_spacing: f64,
    pub minor_spacing: f64,
}

impl AxisTicks {
    /// Picks spacings for `[min, max]`: `nice(range / target)` for major ticks and
    /// `nice(major / minor_per_major)` for minor ticks.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tlcplot::axis::AxisTicks;
    /// let ticks = AxisTicks::new(0.0, 37.0, 10, 4);
    /// assert_eq!(ticks.major_spacing, 5.0);
    /// assert_eq!(ticks.major_ticks().len(), 8);
    /// ```
    pub fn new(min: f64, max: f64, target_ticks: usize, minor_per_major: usize) -> Self {
        let range = if max > min && (max - min).is_finite() { max - min } else { 1.0 };
        let raw = range / target_ticks.max(1) as f64;
        let major_spacing = nice_number(raw, NiceMode::Round);
        let minor_spacing = nice_number(major_spacing / minor_per_major.max(1) as f64, NiceMode::Round);
        debug!(min, max, major_spacing, minor_spacing, "axis spacing");
        AxisTicks {
            min,
            max,
            major_spacing,
            minor_spacing,
        }
    }

    pub fn major_ticks(&self) -> Vec<f64> {
        tick_positions(self.min, self.max, self.major_spacing)
    }

    pub fn minor_ticks(&self) -> Vec<f64> {
        tick_positions(self.min, self.max, self.minor_spacing)
    }
}

/// Formats tick values for axis labels and the highlighted value readout.
pub trait TickLabelFormatter {
    fn format(&self, value: f64) -> String;
}

/// Integers print without a decimal point, everything else with default float formatting.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTickFormatter;

impl TickLabelFormatter for DefaultTickFormatter {
    fn format(&self, value: f64) -> String {
        format_tick_value(value)
    }
}

pub fn format_tick_value(value: f64) -> String {
    if value == value.round() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
