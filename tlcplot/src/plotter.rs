use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, RgbImage, RgbaImage};
use itertools::Itertools;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info, warn};

use tlccore::algorithm::integration::{chord_value, resolve_span};
use tlccore::data::geometry::AxisPoint;
use tlccore::data::peak::Peak;
use tlccore::data::profile::validate_ordering;
use tlccore::data::sample::Sample;
use tlccore::error::{render_error, TlcError, TlcResult};

use crate::axis::{AxisTicks, DefaultTickFormatter, TickLabelFormatter};
use crate::config::{PlotterConfig, RgbColor};
use crate::series::{assign_colors, truncate_name, CurveSeries};

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const MAJOR_TICK_LEN: i32 = 6;
const MINOR_TICK_LEN: i32 = 3;
const MARKER_RADIUS: i32 = 3;
const LEGEND_GAP: i32 = 15;
const LEGEND_ROW: i32 = 20;
const LEGEND_BOX: i32 = 12;
const READOUT_HALF_HEIGHT: i32 = 9;

/// Mapping between data space and pixel space for one canvas size.
///
/// Extents are rounded to integers before scaling and the y maximum carries the
/// configured headroom, so axis labels stay simple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotScale {
    pub left: f64,
    pub top: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub x_scale: f64,
    pub y_scale: f64,
}

impl PlotScale {
    pub fn compute(
        curves: &[CurveSeries],
        config: &PlotterConfig,
        width: u32,
        height: u32,
        with_legend: bool,
    ) -> TlcResult<Self> {
        let margins = config.margins;
        let horizontal = margins.left.saturating_add(config.right_margin(with_legend));
        let vertical = margins.top.saturating_add(margins.bottom);
        if width <= horizontal || height <= vertical {
            return Err(TlcError::InvalidCanvas { width, height });
        }

        let finite = curves
            .iter()
            .flat_map(|curve| curve.points.points().iter())
            .filter(|p| p.x.is_finite() && p.y.is_finite());
        let (mut min_x, mut max_x, mut min_y, mut max_y) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for p in finite {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        if !min_x.is_finite() || !min_y.is_finite() {
            return Err(TlcError::EmptyProfile);
        }

        let min_x = min_x.round();
        let mut max_x = max_x.round();
        if max_x <= min_x {
            max_x = min_x + 1.0;
        }
        let min_y = min_y.round();
        let mut max_y = (max_y + max_y.abs() * config.y_headroom).round();
        if max_y <= min_y {
            max_y = min_y + 1.0;
        }

        let plot_width = f64::from(width - horizontal);
        let plot_height = f64::from(height - vertical);
        let scale = PlotScale {
            left: f64::from(margins.left),
            top: f64::from(margins.top),
            plot_width,
            plot_height,
            min_x,
            max_x,
            min_y,
            max_y,
            x_scale: plot_width / (max_x - min_x),
            y_scale: plot_height / (max_y - min_y),
        };
        debug!(width, height, min_x, max_x, min_y, max_y, x_scale = scale.x_scale, y_scale = scale.y_scale, "plot scale");
        Ok(scale)
    }

    pub fn x_pixel(&self, x: f64) -> i32 {
        (self.left + (x - self.min_x) * self.x_scale).round() as i32
    }

    pub fn y_pixel(&self, y: f64) -> i32 {
        (self.top + self.plot_height - (y - self.min_y) * self.y_scale).round() as i32
    }

    pub fn to_pixel(&self, point: AxisPoint) -> (i32, i32) {
        (self.x_pixel(point.x), self.y_pixel(point.y))
    }

    fn left_px(&self) -> i32 {
        self.left.round() as i32
    }

    fn top_px(&self) -> i32 {
        self.top.round() as i32
    }

    fn right_px(&self) -> i32 {
        (self.left + self.plot_width).round() as i32
    }

    fn bottom_px(&self) -> i32 {
        (self.top + self.plot_height).round() as i32
    }
}

/// Outline of the area between a curve and its chord over an index span.
///
/// The upper edge follows `max(curve, chord)` with crossing points inserted where the
/// curve passes through the chord; the polygon closes along the chord itself. Its
/// area is the part of the curve above the baseline. Empty for a zero-width span or
/// when nothing lies above the chord.
pub fn integration_area(points: &[AxisPoint], start: usize, end: usize) -> Vec<AxisPoint> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    if lo == hi || hi >= points.len() {
        return Vec::new();
    }
    let span = &points[lo..=hi];
    let (first, last) = (span[0], span[span.len() - 1]);
    let above = |p: AxisPoint| p.y - chord_value(first, last, p.x);
    if span.iter().all(|&p| above(p) <= 0.0) {
        return Vec::new();
    }

    let mut outline = Vec::with_capacity(span.len() + 4);
    outline.push(AxisPoint::new(first.x, chord_value(first, last, first.x)));
    for (a, b) in span.iter().copied().tuple_windows() {
        let (da, db) = (above(a), above(b));
        if da * db < 0.0 {
            let t = da / (da - db);
            let x = a.x + t * (b.x - a.x);
            outline.push(AxisPoint::new(x, chord_value(first, last, x)));
        }
        if db > 0.0 {
            outline.push(b);
        } else {
            outline.push(AxisPoint::new(b.x, chord_value(first, last, b.x)));
        }
    }
    outline
}

/// Final raster of one export call.
#[derive(Clone, Debug)]
pub struct RasterExport {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

impl RasterExport {
    pub fn to_png(&self) -> TlcResult<Vec<u8>> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(self.image.as_raw(), self.width, self.height, image::ExtendedColorType::Rgba8)
            .map_err(|e| render_error("png encode", e))?;
        Ok(png)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Draws text and counts failures instead of aborting the paint.
///
/// Without a registered font every label fails the same way, so the raster stays
/// deterministic.
struct LabelPainter<'f> {
    family: &'f str,
    size: f64,
    failures: usize,
}

impl<'f> LabelPainter<'f> {
    fn new(config: &'f PlotterConfig) -> Self {
        LabelPainter {
            family: &config.font_family,
            size: f64::from(config.font_size),
            failures: 0,
        }
    }

    fn draw(&mut self, root: &Canvas<'_>, text: &str, at: (i32, i32), color: RgbColor, h: HPos, v: VPos) {
        let style = FontDesc::new(FontFamily::Name(self.family), self.size, FontStyle::Normal)
            .color(&RGBColor::from(color))
            .pos(Pos::new(h, v));
        if let Err(err) = root.draw(&Text::new(text.to_string(), at, style)) {
            if self.failures == 0 {
                debug!(%err, text, "label not drawn");
            }
            self.failures += 1;
        }
    }

    fn finish(self) {
        if self.failures > 0 {
            warn!(family = self.family, skipped = self.failures, "label font unavailable, text skipped");
        }
    }
}

/// Chart renderer for one lane (with baseline, integration areas and peak markers) or
/// several overlaid lanes (with a legend).
///
/// Inputs are validated at construction. Painting never mutates the plotter, so one
/// instance can export at any number of sizes.
///
/// # Example
///
/// ```rust
/// # use tlccore::data::geometry::AxisPoint;
/// # use tlcplot::config::PlotterConfig;
/// # use tlcplot::plotter::Plotter;
/// let curve = (0..50).map(|i| AxisPoint::new(i as f64, (i % 7) as f64)).collect();
/// let plotter = Plotter::single("lane 1", curve, None, Vec::new(), PlotterConfig::default()).unwrap();
/// let raster = plotter.export(400, 250).unwrap();
/// assert_eq!((raster.width, raster.height), (400, 250));
/// ```
pub struct Plotter {
    config: PlotterConfig,
    curves: Vec<CurveSeries>,
    baseline: Vec<AxisPoint>,
    peaks: Vec<Peak>,
    highlight_y: Option<f64>,
    formatter: Box<dyn TickLabelFormatter>,
}

impl Plotter {
    /// Single-curve renderer with an optional curve baseline and the lane's peaks.
    ///
    /// # Errors
    ///
    /// `InvalidCurveOrdering` for a non x-monotonic curve or baseline, `EmptyProfile`
    /// for an empty curve.
    pub fn single(
        name: impl Into<String>,
        curve: Vec<AxisPoint>,
        baseline: Option<Vec<AxisPoint>>,
        peaks: Vec<Peak>,
        config: PlotterConfig,
    ) -> TlcResult<Self> {
        let baseline = baseline.unwrap_or_default();
        validate_ordering(&baseline)?;
        let curves = vec![CurveSeries::new(name, curve)?];
        Ok(Self::assemble(curves, baseline, peaks, config))
    }

    /// Overlay renderer; a legend is drawn when more than one curve is given.
    pub fn multi(curves: Vec<(String, Vec<AxisPoint>)>, config: PlotterConfig) -> TlcResult<Self> {
        if curves.is_empty() {
            return Err(TlcError::EmptyProfile);
        }
        let curves = curves
            .into_iter()
            .map(|(name, points)| CurveSeries::new(name, points))
            .collect::<TlcResult<Vec<_>>>()?;
        Ok(Self::assemble(curves, Vec::new(), Vec::new(), config))
    }

    pub fn from_sample(sample: &Sample, config: PlotterConfig) -> TlcResult<Self> {
        Self::single(
            sample.name.clone(),
            sample.mean.points().to_vec(),
            None,
            sample.peaks().to_vec(),
            config,
        )
    }

    fn assemble(mut curves: Vec<CurveSeries>, baseline: Vec<AxisPoint>, peaks: Vec<Peak>, config: PlotterConfig) -> Self {
        assign_colors(&mut curves, &config.palette, config.color_seed);
        Plotter {
            config,
            curves,
            baseline,
            peaks,
            highlight_y: None,
            formatter: Box::new(DefaultTickFormatter),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn TickLabelFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    pub fn curves(&self) -> &[CurveSeries] {
        &self.curves
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn is_single(&self) -> bool {
        self.curves.len() == 1
    }

    pub fn has_legend(&self) -> bool {
        self.curves.len() > 1
    }

    /// Returns false when `index` names no curve.
    pub fn set_curve_visible(&mut self, index: usize, visible: bool) -> bool {
        match self.curves.get_mut(index) {
            Some(curve) => {
                curve.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_curve_color(&mut self, index: usize, color: RgbColor) -> bool {
        match self.curves.get_mut(index) {
            Some(curve) => {
                curve.color = color;
                true
            }
            None => false,
        }
    }

    pub fn set_highlight_y(&mut self, value: Option<f64>) {
        self.highlight_y = value;
    }

    pub fn scale(&self, width: u32, height: u32) -> TlcResult<PlotScale> {
        PlotScale::compute(&self.curves, &self.config, width, height, self.has_legend())
    }

    /// Raster at the configured canvas size.
    pub fn render(&self) -> TlcResult<RasterExport> {
        self.export(self.config.width, self.config.height)
    }

    /// Paints into an off-screen buffer of the requested size.
    ///
    /// # Errors
    ///
    /// `InvalidCanvas` when the margins leave no plot area, `Render` when the
    /// drawing backend fails.
    pub fn export(&self, width: u32, height: u32) -> TlcResult<RasterExport> {
        let scale = self.scale(width, height)?;
        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.paint(&root, &scale, width, height)?;
            root.present().map_err(|e| render_error("present", e))?;
        }
        let rgb = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| TlcError::Render(format!("buffer does not fit {width}x{height}")))?;
        let image = DynamicImage::ImageRgb8(rgb).to_rgba8();
        info!(width, height, curves = self.curves.len(), "raster exported");
        Ok(RasterExport { image, width, height })
    }

    fn paint(&self, root: &Canvas<'_>, scale: &PlotScale, width: u32, height: u32) -> TlcResult<()> {
        let config = &self.config;
        let x_ticks = AxisTicks::new(scale.min_x, scale.max_x, config.x_target_ticks, config.minor_ticks_per_major);
        let y_ticks = AxisTicks::new(scale.min_y, scale.max_y, config.y_target_ticks, config.minor_ticks_per_major);
        let mut labels = LabelPainter::new(config);

        if config.paint_background {
            root.fill(&RGBColor::from(config.background))
                .map_err(|e| render_error("background", e))?;
        }
        self.paint_grid(root, scale, &x_ticks.minor_ticks(), &y_ticks.minor_ticks(), config.minor_grid)?;
        self.paint_grid(root, scale, &x_ticks.major_ticks(), &y_ticks.major_ticks(), config.major_grid)?;
        self.paint_curves(root, scale)?;
        if self.is_single() {
            self.paint_peak_areas(root, scale)?;
            if config.draw_peak_markers {
                self.paint_markers(root, scale, &mut labels)?;
            }
        }
        self.paint_axes(root, scale)?;
        self.paint_ticks(root, scale, &x_ticks, &y_ticks)?;
        self.paint_tick_labels(root, scale, &x_ticks, &y_ticks, &mut labels);
        self.paint_axis_names(root, scale, height, &mut labels);
        if self.has_legend() {
            self.paint_legend(root, scale, width, &mut labels)?;
        }
        if let Some(value) = self.highlight_y {
            self.paint_highlight(root, scale, value, &mut labels)?;
        }

        labels.finish();
        Ok(())
    }

    fn paint_grid(&self, root: &Canvas<'_>, scale: &PlotScale, xs: &[f64], ys: &[f64], color: RgbColor) -> TlcResult<()> {
        let style = RGBColor::from(color).stroke_width(1);
        for &x in xs {
            let px = scale.x_pixel(x);
            root.draw(&PathElement::new(vec![(px, scale.top_px()), (px, scale.bottom_px())], style))
                .map_err(|e| render_error("grid", e))?;
        }
        for &y in ys {
            let py = scale.y_pixel(y);
            root.draw(&PathElement::new(vec![(scale.left_px(), py), (scale.right_px(), py)], style))
                .map_err(|e| render_error("grid", e))?;
        }
        Ok(())
    }

    fn paint_curves(&self, root: &Canvas<'_>, scale: &PlotScale) -> TlcResult<()> {
        for curve in self.curves.iter().filter(|c| c.visible) {
            let color = RGBColor::from(curve.color);
            let pixels: Vec<(i32, i32)> = curve.points.points().iter().map(|&p| scale.to_pixel(p)).collect();

            if self.config.fill_curves {
                if let (Some((first_x, last_x)), Some((floor, _))) = (curve.points.domain(), curve.points.y_range()) {
                    let mut outline = pixels.clone();
                    outline.push(scale.to_pixel(AxisPoint::new(last_x, floor)));
                    outline.push(scale.to_pixel(AxisPoint::new(first_x, floor)));
                    root.draw(&Polygon::new(outline, color.mix(self.config.curve_fill_alpha).filled()))
                        .map_err(|e| render_error("curve fill", e))?;
                }
            }
            root.draw(&PathElement::new(pixels, color.stroke_width(2)))
                .map_err(|e| render_error("curve", e))?;
        }
        Ok(())
    }

    /// Integration areas and baseline chords of the single curve.
    fn paint_peak_areas(&self, root: &Canvas<'_>, scale: &PlotScale) -> TlcResult<()> {
        let Some(curve) = self.curves.first().filter(|c| c.visible) else {
            return Ok(());
        };
        let baseline_style = RGBColor::from(self.config.baseline).stroke_width(1);

        for peak in &self.peaks {
            let Some(limits) = peak.limits else {
                continue;
            };
            let (start, end) = match resolve_span(&curve.points, limits) {
                Ok(span) => span,
                Err(err) => {
                    debug!(peak = peak.id, %err, "peak not drawn");
                    continue;
                }
            };
            if start == end {
                continue;
            }

            if self.config.fill_integration_area {
                let area = integration_area(curve.points.points(), start, end);
                if area.len() >= 3 {
                    let outline: Vec<(i32, i32)> = area.iter().map(|&p| scale.to_pixel(p)).collect();
                    let fill = RGBColor::from(self.config.integration).mix(self.config.integration_alpha).filled();
                    root.draw(&Polygon::new(outline, fill))
                        .map_err(|e| render_error("integration area", e))?;
                }
            }

            if self.config.draw_baseline {
                let chord: Vec<(i32, i32)> = if peak.baseline.len() >= 2 {
                    peak.baseline.iter().map(|&p| scale.to_pixel(p)).collect()
                } else {
                    let span = curve.points.slice(start, end);
                    match (span.first(), span.last()) {
                        (Some(&a), Some(&b)) => vec![scale.to_pixel(a), scale.to_pixel(b)],
                        _ => Vec::new(),
                    }
                };
                root.draw(&PathElement::new(chord, baseline_style))
                    .map_err(|e| render_error("baseline", e))?;
            }
        }

        if self.config.draw_baseline && self.baseline.len() >= 2 {
            let pixels: Vec<(i32, i32)> = self.baseline.iter().map(|&p| scale.to_pixel(p)).collect();
            root.draw(&PathElement::new(pixels, baseline_style))
                .map_err(|e| render_error("curve baseline", e))?;
        }
        Ok(())
    }

    fn paint_markers(&self, root: &Canvas<'_>, scale: &PlotScale, labels: &mut LabelPainter<'_>) -> TlcResult<()> {
        if self.curves.first().filter(|c| c.visible).is_none() {
            return Ok(());
        }
        let color = RGBColor::from(self.config.marker);
        for peak in &self.peaks {
            let Some(apex) = peak.maximum() else {
                continue;
            };
            let (px, py) = scale.to_pixel(apex);
            root.draw(&Circle::new((px, py), MARKER_RADIUS, color.filled()))
                .map_err(|e| render_error("peak marker", e))?;
            let number = (peak.id + 1).to_string();
            labels.draw(root, &number, (px, py - MARKER_RADIUS - 2), self.config.marker, HPos::Center, VPos::Bottom);
        }
        Ok(())
    }

    fn paint_axes(&self, root: &Canvas<'_>, scale: &PlotScale) -> TlcResult<()> {
        let style = RGBColor::from(self.config.axis).stroke_width(1);
        let corner = (scale.left_px(), scale.bottom_px());
        root.draw(&PathElement::new(vec![corner, (scale.right_px(), corner.1)], style))
            .map_err(|e| render_error("x axis", e))?;
        root.draw(&PathElement::new(vec![corner, (corner.0, scale.top_px())], style))
            .map_err(|e| render_error("y axis", e))?;
        Ok(())
    }

    fn paint_ticks(&self, root: &Canvas<'_>, scale: &PlotScale, x_ticks: &AxisTicks, y_ticks: &AxisTicks) -> TlcResult<()> {
        let style = RGBColor::from(self.config.axis).stroke_width(1);
        let (left, bottom) = (scale.left_px(), scale.bottom_px());
        let sets = [(x_ticks.minor_ticks(), y_ticks.minor_ticks(), MINOR_TICK_LEN), (x_ticks.major_ticks(), y_ticks.major_ticks(), MAJOR_TICK_LEN)];

        for (xs, ys, len) in sets {
            for x in xs {
                let px = scale.x_pixel(x);
                root.draw(&PathElement::new(vec![(px, bottom), (px, bottom + len)], style))
                    .map_err(|e| render_error("x tick", e))?;
            }
            for y in ys {
                let py = scale.y_pixel(y);
                root.draw(&PathElement::new(vec![(left - len, py), (left, py)], style))
                    .map_err(|e| render_error("y tick", e))?;
            }
        }
        Ok(())
    }

    fn paint_tick_labels(&self, root: &Canvas<'_>, scale: &PlotScale, x_ticks: &AxisTicks, y_ticks: &AxisTicks, labels: &mut LabelPainter<'_>) {
        let color = self.config.axis;
        for x in x_ticks.major_ticks() {
            let at = (scale.x_pixel(x), scale.bottom_px() + MAJOR_TICK_LEN + 2);
            labels.draw(root, &self.formatter.format(x), at, color, HPos::Center, VPos::Top);
        }
        for y in y_ticks.major_ticks() {
            let at = (scale.left_px() - MAJOR_TICK_LEN - 3, scale.y_pixel(y));
            labels.draw(root, &self.formatter.format(y), at, color, HPos::Right, VPos::Center);
        }
    }

    fn paint_axis_names(&self, root: &Canvas<'_>, scale: &PlotScale, height: u32, labels: &mut LabelPainter<'_>) {
        let color = self.config.axis;
        let centre = ((scale.left + scale.plot_width / 2.0).round() as i32, height as i32 - 6);
        labels.draw(root, &self.config.x_axis_name, centre, color, HPos::Center, VPos::Bottom);
        labels.draw(root, &self.config.y_axis_name, (scale.left_px(), scale.top_px() - 8), color, HPos::Center, VPos::Bottom);
    }

    /// One row per curve: visibility checkbox, color swatch, truncated name.
    fn paint_legend(&self, root: &Canvas<'_>, scale: &PlotScale, width: u32, labels: &mut LabelPainter<'_>) -> TlcResult<()> {
        let x0 = scale.right_px() + LEGEND_GAP;
        if x0 >= width as i32 {
            return Ok(());
        }
        let axis = RGBColor::from(self.config.axis);

        for (row, curve) in self.curves.iter().enumerate() {
            let y0 = scale.top_px() + row as i32 * LEGEND_ROW;
            let checkbox = [(x0, y0), (x0 + LEGEND_BOX, y0 + LEGEND_BOX)];
            root.draw(&Rectangle::new(checkbox, axis.stroke_width(1)))
                .map_err(|e| render_error("legend checkbox", e))?;
            if curve.visible {
                root.draw(&Rectangle::new([(x0 + 3, y0 + 3), (x0 + LEGEND_BOX - 3, y0 + LEGEND_BOX - 3)], axis.filled()))
                    .map_err(|e| render_error("legend checkbox", e))?;
            }

            let sx = x0 + LEGEND_BOX + 4;
            root.draw(&Rectangle::new([(sx, y0), (sx + LEGEND_BOX, y0 + LEGEND_BOX)], RGBColor::from(curve.color).filled()))
                .map_err(|e| render_error("legend swatch", e))?;

            let name = truncate_name(&curve.name, self.config.legend_name_chars);
            labels.draw(root, &name, (sx + LEGEND_BOX + 6, y0 + LEGEND_BOX / 2), self.config.axis, HPos::Left, VPos::Center);
        }
        Ok(())
    }

    fn paint_highlight(&self, root: &Canvas<'_>, scale: &PlotScale, value: f64, labels: &mut LabelPainter<'_>) -> TlcResult<()> {
        if !(value >= scale.min_y && value <= scale.max_y) {
            debug!(value, "highlight outside the y range");
            return Ok(());
        }
        let py = scale.y_pixel(value);
        let marker = RGBColor::from(self.config.marker);
        root.draw(&PathElement::new(vec![(scale.left_px(), py), (scale.right_px(), py)], marker.stroke_width(1)))
            .map_err(|e| render_error("highlight line", e))?;

        let corners = [(2, py - READOUT_HALF_HEIGHT), (scale.left_px() - 2, py + READOUT_HALF_HEIGHT)];
        root.draw(&Rectangle::new(corners, RGBColor::from(self.config.background).filled()))
            .map_err(|e| render_error("highlight box", e))?;
        root.draw(&Rectangle::new(corners, marker.stroke_width(1)))
            .map_err(|e| render_error("highlight box", e))?;
        labels.draw(root, &self.formatter.format(value), (scale.left_px() - 5, py), self.config.marker, HPos::Right, VPos::Center);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlccore::data::profile::Profile;

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

    fn triangle() -> Vec<AxisPoint> {
        [(0.0, 0.0), (1.0, 0.0), (5.0, 10.0), (9.0, 0.0), (10.0, 0.0)]
            .into_iter()
            .map(AxisPoint::from)
            .collect()
    }

    #[test]
    fn test_scale_rounds_extents_and_adds_headroom() {
        let curve = vec![AxisPoint::new(0.4, 0.2), AxisPoint::new(5.0, 50.0), AxisPoint::new(9.6, 3.0)];
        let plotter = Plotter::single("lane", curve, None, Vec::new(), PlotterConfig::default()).unwrap();
        let scale = plotter.scale(800, 500).unwrap();

        assert_eq!((scale.min_x, scale.max_x), (0.0, 10.0));
        assert_eq!((scale.min_y, scale.max_y), (0.0, 54.0));
        assert!((scale.x_scale - 71.0).abs() < 1e-12);
        assert!((scale.y_scale - 415.0 / 54.0).abs() < 1e-12);
        assert_eq!(scale.to_pixel(AxisPoint::new(0.0, 0.0)), (70, 445));
        assert_eq!(scale.to_pixel(AxisPoint::new(10.0, 54.0)), (780, 30));
    }

    #[test]
    fn test_flat_curve_gets_unit_range() {
        let curve = vec![AxisPoint::new(2.0, 3.0), AxisPoint::new(2.0, 3.0)];
        let plotter = Plotter::single("flat", curve, None, Vec::new(), PlotterConfig::default()).unwrap();
        let scale = plotter.scale(800, 500).unwrap();
        assert_eq!((scale.min_x, scale.max_x), (2.0, 3.0));
        assert_eq!((scale.min_y, scale.max_y), (3.0, 4.0));
    }

    #[test]
    fn test_legend_widens_right_margin() {
        let curve = triangle();
        let single = Plotter::single("a", curve.clone(), None, Vec::new(), PlotterConfig::default()).unwrap();
        let multi = Plotter::multi(vec![("a".into(), curve.clone()), ("b".into(), curve)], PlotterConfig::default()).unwrap();
        assert!(!single.has_legend());
        assert!(multi.has_legend());
        assert!(multi.scale(800, 500).unwrap().plot_width < single.scale(800, 500).unwrap().plot_width);
    }

    #[test]
    fn test_canvas_smaller_than_margins() {
        let plotter = Plotter::single("a", triangle(), None, Vec::new(), PlotterConfig::default()).unwrap();
        assert_eq!(plotter.export(80, 60).unwrap_err(), TlcError::InvalidCanvas { width: 80, height: 60 });
    }

    #[test]
    fn test_integration_area_of_triangle() {
        let area = integration_area(&triangle(), 0, 4);
        assert!((shoelace(&area) - 40.0).abs() < 1e-12);
        assert_eq!(integration_area(&triangle(), 4, 0), area);
    }

    #[test]
    fn test_integration_area_clips_below_chord() {
        let points: Vec<AxisPoint> = [(0.0, 0.0), (1.0, 2.0), (2.0, -2.0), (3.0, 0.0)]
            .into_iter()
            .map(AxisPoint::from)
            .collect();
        let area = integration_area(&points, 0, 3);
        assert!(area.contains(&AxisPoint::new(1.5, 0.0)));
        assert!((shoelace(&area) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_integration_area_empty_cases() {
        assert!(integration_area(&triangle(), 2, 2).is_empty());
        assert!(integration_area(&triangle(), 0, 9).is_empty());
        let valley = Profile::from_values(&[5.0, 1.0, 5.0]);
        assert!(integration_area(valley.points(), 0, 2).is_empty());
    }

    #[test]
    fn test_curve_controls() {
        let mut plotter = Plotter::single("a", triangle(), None, Vec::new(), PlotterConfig::default()).unwrap();
        assert!(plotter.set_curve_visible(0, false));
        assert!(!plotter.set_curve_visible(3, false));
        assert!(plotter.set_curve_color(0, RgbColor::new(1, 2, 3)));
        assert_eq!(plotter.curves()[0].color, RgbColor::new(1, 2, 3));
        assert!(!plotter.curves()[0].visible);
    }
}
