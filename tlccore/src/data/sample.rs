use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::algorithm::integration::update_relative_surfaces;
use crate::data::geometry::PixelRegion;
use crate::data::peak::Peak;
use crate::data::profile::Profile;

/// One lane/track on the plate.
///
/// The sample owns its images, cut region, profile and peaks exclusively; `clone()`
/// deep-copies all of them. Images are opaque handles and are not serialized.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Index in the parent experiment at insertion time.
    pub id: usize,
    pub name: String,
    /// Cut region on the parent experiment image, in pixels.
    pub limits: Option<PixelRegion>,
    #[serde(skip)]
    pub source_image: Option<DynamicImage>,
    #[serde(skip)]
    pub processed_image: Option<DynamicImage>,
    pub front_point: i32,
    pub seed_point: i32,
    /// Lane intensity profile.
    pub mean: Profile,
    /// Whether front/seed points follow the values shared across the experiment.
    pub linked: bool,
    peaks: Vec<Peak>,
    total_surface: Option<f64>,
}

impl Sample {
    pub fn new(id: usize, name: impl Into<String>, source_image: Option<DynamicImage>) -> Self {
        Sample {
            id,
            name: name.into(),
            source_image,
            ..Default::default()
        }
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Mutable access to peak contents; the list length stays under the sample's control.
    pub fn peaks_mut(&mut self) -> &mut [Peak] {
        &mut self.peaks
    }

    pub fn peak(&self, index: usize) -> Option<&Peak> {
        self.peaks.get(index)
    }

    /// Appends a peak, assigns it the next dense id and renormalizes relative surfaces.
    pub fn add_peak(&mut self, peak: Peak) -> usize {
        let id = self.push_peak(peak);
        update_relative_surfaces(self);
        id
    }

    /// Replaces the peak list, rebuilding ids from zero.
    pub fn set_peaks(&mut self, peaks: Vec<Peak>) {
        self.peaks.clear();
        for peak in peaks {
            self.push_peak(peak);
        }
        update_relative_surfaces(self);
    }

    /// Removes one peak and rebuilds the remaining list so ids stay dense.
    pub fn remove_peak(&mut self, index: usize) -> Option<Peak> {
        if index >= self.peaks.len() {
            return None;
        }
        let mut remaining = std::mem::take(&mut self.peaks);
        let removed = remaining.remove(index);
        self.set_peaks(remaining);
        Some(removed)
    }

    fn push_peak(&mut self, mut peak: Peak) -> usize {
        let id = self.peaks.len();
        peak.id = id;
        self.peaks.push(peak);
        id
    }

    /// Empties the peak list and invalidates the total surface.
    pub fn clear_peaks(&mut self) {
        self.peaks.clear();
        self.total_surface = None;
    }

    /// Releases both images and empties the profile and every derived collection.
    pub fn clear(&mut self) {
        self.source_image = None;
        self.processed_image = None;
        self.mean = Profile::default();
        self.clear_peaks();
    }

    pub fn total_surface(&self) -> Option<f64> {
        self.total_surface
    }

    pub(crate) fn set_total_surface(&mut self, total: Option<f64>) {
        self.total_surface = total;
    }

    pub(crate) fn profile_and_peaks_mut(&mut self) -> (&Profile, &mut [Peak]) {
        (&self.mean, &mut self.peaks)
    }

    pub fn has_profile(&self) -> bool {
        !self.mean.is_empty()
    }

    /// Sum of the peaks' relative surfaces; close to 100 after a full integration.
    pub fn relative_surface_sum(&self) -> f64 {
        self.peaks.iter().filter_map(|p| p.relative_surface).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geometry::PeakLimits;
    use image::RgbaImage;

    fn sample_with_peaks(n: usize) -> Sample {
        let mut sample = Sample::new(0, "lane A", None);
        for i in 0..n {
            sample.add_peak(Peak::from_limits(format!("p{i}"), PeakLimits::new(i as f64, i as f64 + 1.0)));
        }
        sample
    }

    #[test]
    fn test_add_peak_assigns_dense_ids() {
        let sample = sample_with_peaks(3);
        let ids: Vec<usize> = sample.peaks().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_peak_rebuilds_ids() {
        let mut sample = sample_with_peaks(4);
        let removed = sample.remove_peak(1).unwrap();
        assert_eq!(removed.name, "p1");
        let ids: Vec<usize> = sample.peaks().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(sample.peaks()[1].name, "p2");
        assert!(sample.remove_peak(7).is_none());
    }

    fn integrated(name: &str, surface: f64) -> Peak {
        Peak {
            surface: Some(surface),
            ..Peak::new(name)
        }
    }

    #[test]
    fn test_remove_peak_renormalizes_surfaces() {
        let mut sample = Sample::new(0, "lane D", None);
        sample.set_peaks(vec![integrated("a", 12.0), integrated("b", 20.0), integrated("c", 8.0)]);
        assert_eq!(sample.total_surface(), Some(40.0));
        assert_eq!(sample.peaks()[1].relative_surface, Some(50.0));

        sample.remove_peak(0);
        assert_eq!(sample.total_surface(), Some(28.0));
        assert!((sample.relative_surface_sum() - 100.0).abs() < 1e-9);
        let b = sample.peaks()[0].relative_surface.unwrap();
        assert!((b - 100.0 * 20.0 / 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_integrated_peak_updates_total() {
        let mut sample = Sample::new(0, "lane E", None);
        sample.add_peak(integrated("a", 32.0));
        assert_eq!(sample.peaks()[0].relative_surface, Some(100.0));

        sample.add_peak(integrated("b", 10.0));
        assert_eq!(sample.total_surface(), Some(42.0));
        assert!((sample.relative_surface_sum() - 100.0).abs() < 1e-9);

        // an unintegrated peak takes no share
        sample.add_peak(Peak::new("c"));
        assert_eq!(sample.total_surface(), Some(42.0));
        assert!(sample.peaks()[2].relative_surface.is_none());
    }

    #[test]
    fn test_clear_peaks_invalidates_total() {
        let mut sample = sample_with_peaks(2);
        sample.set_total_surface(Some(42.0));
        sample.clear_peaks();
        assert!(sample.total_surface().is_none());
        assert!(sample.peaks().is_empty());
    }

    #[test]
    fn test_clear_releases_images() {
        let mut sample = Sample::new(2, "lane C", Some(DynamicImage::ImageRgba8(RgbaImage::new(4, 4))));
        sample.processed_image = Some(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)));
        sample.mean = Profile::from_values(&[1.0, 2.0]);
        sample.add_peak(Peak::new("x"));

        sample.clear();
        assert!(sample.source_image.is_none());
        assert!(sample.processed_image.is_none());
        assert!(!sample.has_profile());
        assert!(sample.peaks().is_empty());
        assert_eq!(sample.name, "lane C");
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = sample_with_peaks(2);
        original.set_total_surface(Some(10.0));
        original.source_image = Some(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));

        let mut copy = original.clone();
        copy.clear_peaks();
        copy.source_image = None;

        assert_eq!(original.peaks().len(), 2);
        assert_eq!(original.total_surface(), Some(10.0));
        assert!(original.source_image.is_some());
    }
}
