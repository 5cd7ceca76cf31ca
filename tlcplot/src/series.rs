use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tlccore::data::geometry::AxisPoint;
use tlccore::data::profile::Profile;
use tlccore::error::{TlcError, TlcResult};

use crate::config::RgbColor;

/// One curve on the chart with everything the legend needs.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSeries {
    pub points: Profile,
    pub name: String,
    pub color: RgbColor,
    pub visible: bool,
}

impl CurveSeries {
    /// Validates ordering first, then emptiness.
    pub fn new(name: impl Into<String>, points: Vec<AxisPoint>) -> TlcResult<Self> {
        let points = Profile::new(points)?;
        if points.is_empty() {
            return Err(TlcError::EmptyProfile);
        }
        Ok(CurveSeries {
            points,
            name: name.into(),
            color: RgbColor::new(0, 0, 0),
            visible: true,
        })
    }
}

/// Colors curves from the palette in order, then from a generator seeded with `seed`.
pub fn assign_colors(series: &mut [CurveSeries], palette: &[RgbColor], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for (i, curve) in series.iter_mut().enumerate() {
        curve.color = match palette.get(i) {
            Some(&color) => color,
            None => RgbColor::new(rng.gen(), rng.gen(), rng.gen()),
        };
    }
}

/// Shortens `name` to at most `max_chars` characters, marking the cut with "...".
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut short: String = name.chars().take(keep).collect();
    short.push_str("...");
    short
}
