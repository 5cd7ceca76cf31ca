use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data::geometry::AxisPoint;
use crate::error::{TlcError, TlcResult};

/// An x-monotonic (non-decreasing abscissa) intensity curve.
///
/// This is the lane "mean": every point is (position along the lane, intensity).
/// Construction validates the ordering, so integration and rendering can rely on it.
///
/// # Example
///
/// ```rust
/// # use tlccore::data::profile::Profile;
/// let profile = Profile::from_values(&[0.0, 2.0, 6.0, 2.0, 0.0]);
/// assert_eq!(profile.len(), 5);
/// assert_eq!(profile.domain(), Some((0.0, 4.0)));
/// assert_eq!(profile.index_of(2.4), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AxisPoint>", into = "Vec<AxisPoint>")]
pub struct Profile {
    points: Vec<AxisPoint>,
}

impl Profile {
    /// Builds a profile, rejecting any point whose abscissa is below its predecessor's.
    ///
    /// # Errors
    ///
    /// `TlcError::InvalidCurveOrdering` with the index of the first offending point.
    pub fn new(points: Vec<AxisPoint>) -> TlcResult<Self> {
        validate_ordering(&points)?;
        Ok(Profile { points })
    }

    /// Profile over the sample index: point `i` is `(i, values[i])`.
    pub fn from_values(values: &[f64]) -> Self {
        Profile {
            points: values
                .iter()
                .enumerate()
                .map(|(i, &y)| AxisPoint::new(i as f64, y))
                .collect(),
        }
    }

    pub fn points(&self) -> &[AxisPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last abscissa.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x)),
            _ => None,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.domain().is_some_and(|(min, max)| x >= min && x <= max)
    }

    /// Resolves an abscissa to a discrete sample: `round((N-1) * (x - xmin) / (xmax - xmin))`.
    ///
    /// Every limit or position lookup goes through here so that integration and the
    /// integration-area polygon always agree on which samples belong to a peak.
    /// The result is clamped to the valid index range.
    pub fn index_of(&self, x: f64) -> Option<usize> {
        let (min, max) = self.domain()?;
        let last = self.points.len() - 1;
        if max <= min {
            return Some(0);
        }
        let raw = (last as f64 * (x - min) / (max - min)).round();
        Some(raw.clamp(0.0, last as f64) as usize)
    }

    pub fn point(&self, index: usize) -> Option<AxisPoint> {
        self.points.get(index).copied()
    }

    /// Inclusive index range, in either order.
    pub fn slice(&self, start: usize, end: usize) -> &[AxisPoint] {
        if self.points.is_empty() {
            return &[];
        }
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        let hi = hi.min(self.points.len() - 1);
        if lo > hi {
            return &[];
        }
        &self.points[lo..=hi]
    }

    /// Linear interpolation of the ordinate at `x`; `None` outside the domain.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        if !self.contains(x) {
            return None;
        }
        let right = self.points.partition_point(|p| p.x < x);
        if right == 0 {
            return Some(self.points[0].y);
        }
        let (a, b) = (self.points[right - 1], self.points[right.min(self.points.len() - 1)]);
        if b.x == a.x {
            return Some(b.y);
        }
        Some(a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x))
    }

    /// Smallest and largest ordinate.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| p.y)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
    }
}

impl TryFrom<Vec<AxisPoint>> for Profile {
    type Error = TlcError;

    fn try_from(points: Vec<AxisPoint>) -> TlcResult<Self> {
        Profile::new(points)
    }
}

impl From<Profile> for Vec<AxisPoint> {
    fn from(profile: Profile) -> Self {
        profile.points
    }
}

/// Checks that abscissas never decrease. NaN abscissas count as out of order.
pub fn validate_ordering(points: &[AxisPoint]) -> TlcResult<()> {
    match points
        .iter()
        .tuple_windows()
        .position(|(a, b)| !(b.x >= a.x))
    {
        Some(i) => Err(TlcError::InvalidCurveOrdering { index: i + 1 }),
        None => Ok(()),
    }
}
