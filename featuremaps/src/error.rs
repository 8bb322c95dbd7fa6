//! Error type shared by every extraction entry point.

use common::parallel::PoolError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating inputs or extracting feature maps.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported image dimensionality {ndim}D: {reason}")]
    UnsupportedDimension { ndim: usize, reason: &'static str },

    #[error("Unknown edge detector '{0}'")]
    UnknownDetector(String),

    #[error("Invalid gray range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("Window has {window_ndim} dimensions but the image has {image_ndim}")]
    DimensionMismatch {
        image_ndim: usize,
        window_ndim: usize,
    },

    #[error("Window shape {window_shape:?} does not fit image shape {image_shape:?}")]
    ShapeMismatch {
        image_shape: Vec<usize>,
        window_shape: Vec<usize>,
    },

    #[error("Feature {index} has shape {actual:?}, expected {expected:?}")]
    FeatureShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Expected {expected} feature results for map shape {map_shape:?}, got {actual}")]
    ResultCountMismatch {
        map_shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Degenerate gray range: min and max are both {value}")]
    DivisionByZero { value: f64 },

    #[error("Image has no samples")]
    EmptyImage,

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Texture statistics need non-negative gray levels, got {0}")]
    NegativeGrayLevel(i64),

    #[error(transparent)]
    WorkerPool(#[from] PoolError),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_detector_message() {
        let err = Error::UnknownDetector("NotARealDetector".into());
        assert_eq!(err.to_string(), "Unknown edge detector 'NotARealDetector'");
    }

    #[test]
    fn test_shape_mismatch_message_lists_shapes() {
        let err = Error::ShapeMismatch {
            image_shape: vec![10, 12],
            window_shape: vec![3, 13],
        };
        let msg = err.to_string();
        assert!(msg.contains("[10, 12]"));
        assert!(msg.contains("[3, 13]"));
    }

    #[test]
    fn test_invalid_range_message() {
        let err = Error::InvalidRange {
            min: 5.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("min 5 is greater than max 1"));
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let err = Error::invalid_parameter("n_theta", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'n_theta': must be at least 1"
        );
    }
}
