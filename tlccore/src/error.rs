use thiserror::Error;

/// Errors raised by the chromatogram model, the integration engine and the renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TlcError {
    #[error("peak limits ({start}, {end}) fall outside the profile domain [{min}, {max}]")]
    OutOfRangeLimits {
        start: f64,
        end: f64,
        min: f64,
        max: f64,
    },
    #[error("integration produced a negative or non-finite surface ({raw_surface})")]
    DegenerateIntegration { raw_surface: f64 },
    #[error("curve abscissa decreases at point {index}")]
    InvalidCurveOrdering { index: usize },
    #[error("no intensity profile available")]
    EmptyProfile,
    #[error("canvas {width}x{height} leaves no room for the plot area")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("label font rejected: {0}")]
    Font(String),
}

pub type TlcResult<T> = Result<T, TlcError>;

/// Wraps a drawing backend failure with the layer that was being painted.
#[inline]
pub fn render_error<E: std::fmt::Display>(context: &str, err: E) -> TlcError {
    TlcError::Render(format!("{context}: {err}"))
}

impl TlcError {
    /// Structural failures abort a whole sample or render call; the rest only affect one peak.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            TlcError::OutOfRangeLimits { .. } | TlcError::DegenerateIntegration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_split() {
        assert!(TlcError::EmptyProfile.is_fatal());
        assert!(TlcError::InvalidCurveOrdering { index: 3 }.is_fatal());
        assert!(!TlcError::DegenerateIntegration { raw_surface: -1.0 }.is_fatal());
        assert!(!TlcError::OutOfRangeLimits { start: -1.0, end: 2.0, min: 0.0, max: 1.0 }.is_fatal());
    }

    #[test]
    fn test_render_error_context() {
        let err = render_error("curves", "backend gone");
        assert_eq!(err.to_string(), "rendering failed: curves: backend gone");
    }
}
