use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use chrono::NaiveDate;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::algorithm::integration::{integrate_sample, IntegrationConfig, IntegrationReport};
use crate::data::geometry::PixelRegion;
use crate::data::sample::Sample;
use crate::error::TlcResult;

/// Axis the plate image was mirrored on before cutting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipAxis {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Display for FlipAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FlipAxis::None => write!(f, "None"),
            FlipAxis::Horizontal => write!(f, "Horizontal"),
            FlipAxis::Vertical => write!(f, "Vertical"),
            FlipAxis::Both => write!(f, "Both"),
        }
    }
}

/// Free-text notes, one per workflow step, carried through to reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepComments {
    pub acquisition: String,
    pub crop: String,
    pub rotation: String,
    pub split: String,
    pub processing: String,
    pub integration: String,
}

/// A full plate run: the plate images, its lanes and the provenance needed for reporting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    #[serde(skip)]
    pub source_image: Option<DynamicImage>,
    #[serde(skip)]
    pub processed_image: Option<DynamicImage>,
    /// Region of interest on the source image.
    pub cut_points: Option<PixelRegion>,
    pub flip_axis: FlipAxis,
    /// Degrees.
    pub rotation_angle: f64,
    pub comments: StepComments,
    pub sample_date: Option<NaiveDate>,
    pub analysis_date: Option<NaiveDate>,
    pub saved: bool,
    pub file: Option<PathBuf>,
    samples: Vec<Sample>,
}

impl Experiment {
    pub fn new(name: impl Into<String>, source_image: Option<DynamicImage>) -> Self {
        Experiment {
            name: name.into(),
            source_image,
            ..Default::default()
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    pub fn sample(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn sample_mut(&mut self, index: usize) -> Option<&mut Sample> {
        self.samples.get_mut(index)
    }

    /// Appends a sample; its id becomes the current list length.
    pub fn add_sample(&mut self, mut sample: Sample) -> usize {
        let id = self.samples.len();
        sample.id = id;
        self.samples.push(sample);
        id
    }

    /// Removes a sample without renumbering the others.
    ///
    /// Ids of later samples keep their old values, so a following `add_sample` can
    /// hand out an id that is already taken. Call [`Experiment::reindex_samples`]
    /// when dense ids are required.
    pub fn remove_sample(&mut self, index: usize) -> Option<Sample> {
        (index < self.samples.len()).then(|| self.samples.remove(index))
    }

    /// Renumbers samples to their current positions.
    pub fn reindex_samples(&mut self) {
        for (i, sample) in self.samples.iter_mut().enumerate() {
            sample.id = i;
        }
    }

    /// Copies shared front/seed points into every linked sample.
    pub fn propagate_linked_points(&mut self, front_point: i32, seed_point: i32) -> usize {
        let mut updated = 0;
        for sample in self.samples.iter_mut().filter(|s| s.linked) {
            sample.front_point = front_point;
            sample.seed_point = seed_point;
            updated += 1;
        }
        updated
    }

    /// Integrates every sample independently; one failing sample does not stop the others.
    pub fn integrate_all(&mut self, config: &IntegrationConfig) -> Vec<TlcResult<IntegrationReport>> {
        self.samples
            .iter_mut()
            .map(|sample| integrate_sample(sample, config))
            .collect()
    }

    /// Releases both images and every sample.
    pub fn clear(&mut self) {
        self.source_image = None;
        self.processed_image = None;
        for sample in self.samples.iter_mut() {
            sample.clear();
        }
        self.samples.clear();
    }
}
