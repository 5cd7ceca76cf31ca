// src/lib.rs
//! Chromatogram charts: nice-number axes, curve overlays, baseline and
//! integration-area rendering, raster export.

pub mod axis;
pub mod config;
pub mod font;
pub mod plotter;
pub mod series;

pub use config::PlotterConfig;
pub use font::register_label_font;
pub use plotter::{Plotter, RasterExport};
