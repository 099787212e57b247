//! Error types for chartdig-digitize
//!
//! Fatal pipeline failures carry the [`Stage`] they happened in. Degraded
//! axis calibration and a missing curve are not errors: they are recovered
//! inside the stage and reported through
//! [`Diagnostics`](crate::Diagnostics).

use crate::model::ValidationError;
use crate::units::UnitError;
use chartdig_filter::FilterError;
use chartdig_region::RegionError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Pipeline stage named in [`DigitizeError::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Preprocess,
    Calibrate,
    Extract,
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Preprocess => "preprocess",
            Stage::Calibrate => "calibrate",
            Stage::Extract => "extract",
            Stage::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// Underlying cause of a stage failure.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Errors building a pixel-to-value mapping
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// Declared range does not satisfy `min < max`
    #[error("{axis} axis range not ordered: min {min} must be below max {max}")]
    AxisNotOrdered {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    /// The pixel range has no width
    #[error("{axis} axis pixel range is empty: {from}..{to}")]
    ZeroPixelRange {
        axis: &'static str,
        from: f64,
        to: f64,
    },

    /// Manual axis mode without axis lines in the request
    #[error("manual axis mode requires axis lines in the request")]
    MissingManualAxes,
}

/// Errors that can occur while digitizing a chart
#[derive(Debug, Error)]
pub enum DigitizeError {
    /// The input cannot be decoded into a usable image
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The vision engine was not ready in time
    #[error("vision engine unavailable after {waited:?}: {reason}; retry once it has loaded")]
    EngineUnavailable { waited: Duration, reason: String },

    /// A pipeline stage failed
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: StageError,
    },

    /// The chart data failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options could not be parsed
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

impl DigitizeError {
    /// Wrap a lower-level error with the stage it came from.
    ///
    /// Image and engine errors are lifted to their own variants whatever
    /// the stage.
    pub(crate) fn at(stage: Stage, err: impl Into<StageError>) -> Self {
        match err.into() {
            StageError::Filter(FilterError::InvalidImage(msg)) => DigitizeError::InvalidImage(msg),
            StageError::Region(RegionError::EngineUnavailable { waited, reason }) => {
                DigitizeError::EngineUnavailable { waited, reason }
            }
            source => DigitizeError::Stage { stage, source },
        }
    }

    /// The failing stage, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DigitizeError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for digitize operations
pub type DigitizeResult<T> = Result<T, DigitizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_context_in_message() {
        let err = DigitizeError::at(Stage::Calibrate, CalibrationError::MissingManualAxes);
        assert_eq!(err.stage(), Some(Stage::Calibrate));
        assert!(err.to_string().starts_with("calibrate stage failed"));
    }

    #[test]
    fn test_engine_and_image_errors_are_lifted() {
        let err = DigitizeError::at(
            Stage::Extract,
            RegionError::EngineUnavailable {
                waited: Duration::from_millis(5),
                reason: "still loading".into(),
            },
        );
        assert!(matches!(err, DigitizeError::EngineUnavailable { .. }));
        assert!(err.to_string().contains("retry"));

        let err = DigitizeError::at(Stage::Preprocess, FilterError::InvalidImage("0x0".into()));
        assert!(matches!(err, DigitizeError::InvalidImage(_)));
        assert_eq!(err.stage(), None);
    }
}
