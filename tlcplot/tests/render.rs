use tlccore::algorithm::integration::{integrate_peak, integrate_sample, IntegrationConfig};
use tlccore::data::geometry::{AxisPoint, PeakLimits};
use tlccore::data::peak::Peak;
use tlccore::data::profile::Profile;
use tlccore::data::sample::Sample;
use tlccore::error::TlcError;
use tlcplot::config::{PlotterConfig, RgbColor};
use tlcplot::plotter::{integration_area, Plotter};

fn gaussian_lane(n: usize, centre: f64, width: f64, offset: f64) -> Vec<AxisPoint> {
    (0..n)
        .map(|i| {
            let x = i as f64 * 0.5;
            AxisPoint::new(x, offset + 50.0 * (-0.5 * ((x - centre) / width).powi(2)).exp())
        })
        .collect()
}

fn integrated_sample() -> Sample {
    let mut sample = Sample::new(0, "lane 1", None);
    sample.mean = Profile::new(gaussian_lane(120, 30.0, 3.0, 2.0)).unwrap();
    sample.add_peak(Peak::from_limits("main", PeakLimits::new(20.0, 40.0)));
    integrate_sample(&mut sample, &IntegrationConfig::default()).unwrap();
    sample
}

fn shoelace(points: &[AxisPoint]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

#[test]
fn same_curves_render_identically() {
    let curves: Vec<(String, Vec<AxisPoint>)> = (0..11)
        .map(|k| (format!("lane {k}"), gaussian_lane(80, 5.0 + 3.0 * k as f64, 2.0, k as f64)))
        .collect();

    let first = Plotter::multi(curves.clone(), PlotterConfig::default()).unwrap();
    let second = Plotter::multi(curves, PlotterConfig::default()).unwrap();
    let colors = |p: &Plotter| p.curves().iter().map(|c| c.color).collect::<Vec<_>>();
    assert_eq!(colors(&first), colors(&second));

    let a = first.render().unwrap();
    let b = second.render().unwrap();
    assert_eq!(a.image.as_raw(), b.image.as_raw());
}

#[test]
fn export_leaves_renderer_untouched() {
    let plotter = Plotter::from_sample(&integrated_sample(), PlotterConfig::default()).unwrap();
    let config_before = plotter.config().clone();
    let before = plotter.render().unwrap();

    let large = plotter.export(1600, 900).unwrap();
    assert_eq!((large.width, large.height), (1600, 900));
    assert_eq!(large.image.dimensions(), (1600, 900));

    let after = plotter.render().unwrap();
    assert_eq!((after.width, after.height), (800, 500));
    assert_eq!(before.image.as_raw(), after.image.as_raw());
    assert_eq!(plotter.config(), &config_before);
}

#[test]
fn bad_curves_are_rejected_at_construction() {
    let mut curve = gaussian_lane(20, 5.0, 1.0, 0.0);
    curve.swap(3, 4);
    let err = Plotter::single("bad", curve.clone(), None, Vec::new(), PlotterConfig::default()).err();
    assert_eq!(err, Some(TlcError::InvalidCurveOrdering { index: 4 }));

    let good = gaussian_lane(20, 5.0, 1.0, 0.0);
    let err = Plotter::multi(vec![("ok".into(), good), ("bad".into(), curve)], PlotterConfig::default()).err();
    assert_eq!(err, Some(TlcError::InvalidCurveOrdering { index: 4 }));

    let err = Plotter::single("empty", Vec::new(), None, Vec::new(), PlotterConfig::default()).err();
    assert_eq!(err, Some(TlcError::EmptyProfile));
    assert_eq!(Plotter::multi(Vec::new(), PlotterConfig::default()).err(), Some(TlcError::EmptyProfile));
}

#[test]
fn integration_polygon_matches_surface() {
    let profile = Profile::new(gaussian_lane(120, 30.0, 3.0, 2.0)).unwrap();
    let result = integrate_peak(&profile, PeakLimits::new(20.0, 40.0), &IntegrationConfig::default()).unwrap();

    let polygon = integration_area(profile.points(), result.start_index, result.end_index);
    assert!(polygon.len() > 3);
    assert!((shoelace(&polygon) - result.surface).abs() < 1e-9 * result.surface.max(1.0));
}

#[test]
fn zero_width_peak_is_not_drawn() {
    let mut sample = Sample::new(0, "lane", None);
    sample.mean = Profile::new(gaussian_lane(60, 15.0, 2.0, 1.0)).unwrap();
    let plain = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();

    sample.add_peak(Peak::from_limits("collapsed", PeakLimits::new(12.0, 12.0)));
    integrate_sample(&mut sample, &IntegrationConfig::default()).unwrap();
    assert_eq!(sample.peaks()[0].surface, Some(0.0));
    let with_peak = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();

    assert_eq!(plain.render().unwrap().image.as_raw(), with_peak.render().unwrap().image.as_raw());
}

#[test]
fn out_of_range_peak_is_skipped() {
    let mut sample = Sample::new(0, "lane", None);
    sample.mean = Profile::new(gaussian_lane(60, 15.0, 2.0, 1.0)).unwrap();
    let plain = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();
    sample.add_peak(Peak::from_limits("outside", PeakLimits::new(10.0, 500.0)));
    let with_peak = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();

    assert_eq!(plain.render().unwrap().image.as_raw(), with_peak.render().unwrap().image.as_raw());
}

#[test]
fn layer_toggles_change_the_raster() {
    let sample = integrated_sample();
    let full = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap().render().unwrap();

    let no_area = PlotterConfig {
        fill_integration_area: false,
        ..PlotterConfig::default()
    };
    let without = Plotter::from_sample(&sample, no_area).unwrap().render().unwrap();
    assert_ne!(full.image.as_raw(), without.image.as_raw());

    let mut hidden = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();
    hidden.set_curve_visible(0, false);
    assert_ne!(full.image.as_raw(), hidden.render().unwrap().image.as_raw());

    let mut highlighted = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();
    highlighted.set_highlight_y(Some(20.0));
    assert_ne!(full.image.as_raw(), highlighted.render().unwrap().image.as_raw());
}

#[test]
fn hidden_curve_hides_its_peak_markers() {
    let sample = integrated_sample();
    assert!(sample.peaks()[0].maximum().is_some());

    let mut with_markers = Plotter::from_sample(&sample, PlotterConfig::default()).unwrap();
    with_markers.set_curve_visible(0, false);
    let no_markers_config = PlotterConfig {
        draw_peak_markers: false,
        ..PlotterConfig::default()
    };
    let mut without_markers = Plotter::from_sample(&sample, no_markers_config).unwrap();
    without_markers.set_curve_visible(0, false);

    assert_eq!(
        with_markers.render().unwrap().image.as_raw(),
        without_markers.render().unwrap().image.as_raw()
    );
}

#[test]
fn background_fills_the_margins() {
    let config = PlotterConfig {
        background: RgbColor::new(10, 20, 30),
        ..PlotterConfig::default()
    };
    let raster = Plotter::from_sample(&integrated_sample(), config).unwrap().render().unwrap();
    assert_eq!(raster.image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(raster.image.get_pixel(799, 499).0, [10, 20, 30, 255]);
}

#[test]
fn png_export_has_signature() {
    let raster = Plotter::from_sample(&integrated_sample(), PlotterConfig::default())
        .unwrap()
        .export(320, 200)
        .unwrap();
    let png = raster.to_png().unwrap();
    assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
}
