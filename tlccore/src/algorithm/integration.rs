use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::geometry::{AxisPoint, PeakLimits};
use crate::data::peak::{Peak, PeakApex};
use crate::data::profile::Profile;
use crate::data::sample::Sample;
use crate::error::{TlcError, TlcResult};

/// What to do when curve-minus-chord comes out negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegativeSurfacePolicy {
    /// Store a surface of 0 and flag the peak.
    #[default]
    Clamp,
    /// Leave the peak unintegrated and report it as failed.
    Reject,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// How negative surfaces from malformed limits are handled (default: clamp)
    pub negative_surface: NegativeSurfacePolicy,
}

/// Result of integrating one peak against a profile.
#[derive(Clone, Debug, PartialEq)]
pub struct PeakIntegration {
    pub start_index: usize,
    pub end_index: usize,
    pub surface: f64,
    /// Chord endpoints, ordered by abscissa. Empty for zero-width spans.
    pub baseline: Vec<AxisPoint>,
    pub apex: Option<PeakApex>,
    /// Signed surface before clamping, when it was negative.
    pub clamped_from: Option<f64>,
}

impl PeakIntegration {
    pub fn is_zero_width(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Writes surface, baseline and apex into the peak; relative surface is left to the sample pass.
    pub fn apply_to(&self, peak: &mut Peak) {
        peak.surface = Some(self.surface);
        peak.baseline = self.baseline.clone();
        peak.apex = self.apex;
        peak.relative_surface = None;
    }
}

/// Outcome of a whole-sample integration pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntegrationReport {
    pub integrated: usize,
    /// Ids of peaks without limits.
    pub skipped: Vec<usize>,
    /// Peaks integrated with a clamped surface.
    pub flagged: Vec<(usize, TlcError)>,
    /// Peaks left unintegrated.
    pub failed: Vec<(usize, TlcError)>,
    pub total_surface: Option<f64>,
}

impl IntegrationReport {
    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty() && self.failed.is_empty()
    }
}

/// Resolves limits to an (unsorted) pair of profile indices.
///
/// # Errors
///
/// `EmptyProfile` for an empty profile, `OutOfRangeLimits` when either limit lies
/// outside the profile's abscissa domain.
pub fn resolve_span(profile: &Profile, limits: PeakLimits) -> TlcResult<(usize, usize)> {
    let (min, max) = profile.domain().ok_or(TlcError::EmptyProfile)?;
    if !profile.contains(limits.start) || !profile.contains(limits.end) {
        return Err(TlcError::OutOfRangeLimits {
            start: limits.start,
            end: limits.end,
            min,
            max,
        });
    }
    match (profile.index_of(limits.start), profile.index_of(limits.end)) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(TlcError::EmptyProfile),
    }
}

/// Trapezoidal area under an x-ordered point sequence.
pub fn trapezoid_area(points: &[AxisPoint]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| 0.5 * (a.y + b.y) * (b.x - a.x))
        .sum()
}

/// Ordinate of the chord through `a` and `b` at abscissa `x`.
pub fn chord_value(a: AxisPoint, b: AxisPoint, x: f64) -> f64 {
    if b.x == a.x {
        return a.y;
    }
    a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x)
}

/// Integrates one peak: curve area minus chord area between the resolved limit indices.
///
/// Zero-width spans yield a surface of 0 with no baseline and no apex. Reversed limits
/// integrate to a negative signed area, which goes through the negative-surface policy
/// like any other malformed span.
///
/// # Example
///
/// ```rust
/// # use tlccore::data::profile::Profile;
/// # use tlccore::data::geometry::PeakLimits;
/// # use tlccore::algorithm::integration::{integrate_peak, IntegrationConfig};
/// let profile = Profile::from_values(&[1.0, 1.0, 5.0, 1.0, 1.0]);
/// let result = integrate_peak(&profile, PeakLimits::new(1.0, 3.0), &IntegrationConfig::default()).unwrap();
/// assert!((result.surface - 4.0).abs() < 1e-12);
/// assert_eq!(result.apex.unwrap().height.y, 4.0);
/// ```
pub fn integrate_peak(
    profile: &Profile,
    limits: PeakLimits,
    config: &IntegrationConfig,
) -> TlcResult<PeakIntegration> {
    let (start_index, end_index) = resolve_span(profile, limits)?;

    if limits.is_zero_width() || start_index == end_index {
        return Ok(PeakIntegration {
            start_index,
            end_index,
            surface: 0.0,
            baseline: Vec::new(),
            apex: None,
            clamped_from: None,
        });
    }

    let span = profile.slice(start_index, end_index);
    let (first, last) = (span[0], span[span.len() - 1]);

    let curve_area = trapezoid_area(span);
    let chord_area = 0.5 * (first.y + last.y) * (last.x - first.x);
    let direction = if start_index <= end_index { 1.0 } else { -1.0 };
    let signed = direction * (curve_area - chord_area);
    if !signed.is_finite() {
        return Err(TlcError::DegenerateIntegration { raw_surface: signed });
    }

    // first sample wins ties
    let apex = span
        .iter()
        .rev()
        .max_by_key(|p| OrderedFloat(p.y))
        .map(|&maximum| PeakApex {
            maximum,
            height: AxisPoint::new(maximum.x, maximum.y - chord_value(first, last, maximum.x)),
        });

    let (surface, clamped_from) = if signed < 0.0 {
        match config.negative_surface {
            NegativeSurfacePolicy::Clamp => (0.0, Some(signed)),
            NegativeSurfacePolicy::Reject => {
                return Err(TlcError::DegenerateIntegration { raw_surface: signed })
            }
        }
    } else {
        (signed, None)
    };

    debug!(start_index, end_index, curve_area, chord_area, surface, "peak integrated");

    Ok(PeakIntegration {
        start_index,
        end_index,
        surface,
        baseline: vec![first, last],
        apex,
        clamped_from,
    })
}

/// Recomputes the total surface and every peak's relative surface.
///
/// Must run after all surfaces are final. Peaks without a surface get no relative
/// surface; a zero total gives every integrated peak 0%.
pub fn update_relative_surfaces(sample: &mut Sample) -> Option<f64> {
    let surfaces: Vec<f64> = sample.peaks().iter().filter_map(|p| p.surface).collect();
    let total = if surfaces.is_empty() {
        None
    } else {
        Some(surfaces.iter().sum::<f64>())
    };

    if total == Some(0.0) {
        warn!(sample = sample.id, "total surface is zero, relative surfaces set to 0");
    }

    for peak in sample.peaks_mut() {
        peak.relative_surface = match (peak.surface, total) {
            (Some(surface), Some(total)) if total > 0.0 => Some(100.0 * surface / total),
            (Some(_), Some(_)) => Some(0.0),
            _ => None,
        };
    }

    sample.set_total_surface(total);
    total
}

/// Integrates every peak of a sample, then normalizes relative surfaces.
///
/// Per-peak problems are isolated in the report; only an empty profile aborts.
pub fn integrate_sample(sample: &mut Sample, config: &IntegrationConfig) -> TlcResult<IntegrationReport> {
    if !sample.has_profile() {
        return Err(TlcError::EmptyProfile);
    }

    let sample_id = sample.id;
    let mut report = IntegrationReport::default();
    let (profile, peaks) = sample.profile_and_peaks_mut();

    for peak in peaks.iter_mut() {
        peak.reset_derived();
        let Some(limits) = peak.limits else {
            report.skipped.push(peak.id);
            continue;
        };

        match integrate_peak(profile, limits, config) {
            Ok(result) => {
                if let Some(raw_surface) = result.clamped_from {
                    warn!(sample = sample_id, peak = peak.id, raw_surface, "negative surface clamped to zero");
                    report
                        .flagged
                        .push((peak.id, TlcError::DegenerateIntegration { raw_surface }));
                }
                result.apply_to(peak);
                report.integrated += 1;
            }
            Err(err) => {
                warn!(sample = sample_id, peak = peak.id, %err, "peak integration failed");
                report.failed.push((peak.id, err));
            }
        }
    }

    report.total_surface = update_relative_surfaces(sample);
    Ok(report)
}
