use plotters::style::FontStyle;

use tlccore::error::{TlcError, TlcResult};

/// Registers a TrueType/OpenType font for axis labels, legend names and peak numbers.
///
/// The raster backend bundles no font. Until one is registered under the configured
/// family name, text layers are skipped and everything else is still drawn.
pub fn register_label_font(family: &str, bytes: &'static [u8]) -> TlcResult<()> {
    plotters::style::register_font(family, FontStyle::Normal, bytes)
        .map_err(|_| TlcError::Font(format!("{family}: not a valid TrueType/OpenType font")))
}
