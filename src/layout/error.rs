//! Error types for footprint layout.

use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while building a card-edge footprint.
///
/// Layout is pure: the same parameters always fail the same way, so none of
/// these are retryable.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A parameter is out of range on its own.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Description of what's wrong.
        message: String,
    },

    /// Two dimensions combine into overlapping or disconnected copper.
    #[error("Clearance violation for '{name}' ({pitch} mm against {width} mm): {message}")]
    Clearance {
        /// Name of the pitch or spacing that is too small.
        name: String,
        /// The offending pitch or spacing (mm).
        pitch: f64,
        /// The width it was checked against (mm).
        width: f64,
        /// Description of the resulting defect.
        message: String,
    },

    /// Writing the generated footprint failed.
    #[error("Output error: {message}")]
    OutputError {
        /// Description of what went wrong.
        message: String,
    },
}

impl LayoutError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a clearance error.
    pub fn clearance(
        name: impl Into<String>,
        pitch: f64,
        width: f64,
        message: impl Into<String>,
    ) -> Self {
        Self::Clearance {
            name: name.into(),
            pitch,
            width,
            message: message.into(),
        }
    }

    /// Creates an output error.
    pub fn output_error(message: impl Into<String>) -> Self {
        Self::OutputError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let err = LayoutError::invalid_parameter("pad_pitch", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'pad_pitch': must be positive"
        );
    }

    #[test]
    fn clearance_display_names_both_dimensions() {
        let err = LayoutError::clearance("row_spacing", 1.5, 1.8, "through-hole rows overlap");
        let msg = err.to_string();
        assert!(msg.contains("row_spacing"));
        assert!(msg.contains("1.5"));
        assert!(msg.contains("1.8"));
    }
}
