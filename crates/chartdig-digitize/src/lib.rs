//! chartdig-digitize - From chart image to calibrated data
//!
//! This crate runs the digitization pipeline on top of the preprocessing
//! and vision crates:
//!
//! - [`axis`] - Axis calibration from detected line segments
//! - [`curve`] - Curve extraction from contours or a column scan
//! - [`refine`] - Deduplication, outlier rejection, smoothing, resampling
//! - [`transform`] - The pixel to value mapping
//! - [`units`] - Flow and pressure unit conversion
//! - [`model`] - [`ChartData`] and its validation
//! - [`export`] - Tabular export of valid charts
//! - [`session`] - Latest-wins handling of repeated runs
//!
//! # Examples
//!
//! ```
//! use chartdig_core::{Pix, PixelDepth, color};
//! use chartdig_digitize::{Axis, DigitizeRequest, Digitizer};
//!
//! let mut canvas = Pix::new(200, 150, PixelDepth::Bit32).unwrap().to_mut();
//! canvas.fill(color::compose_rgb(255, 255, 255));
//! let image: Pix = canvas.into();
//!
//! let request = DigitizeRequest::new(
//!     Axis::new(0.0, 40.0, "CFM", "X"),
//!     Axis::new(0.0, 10.0, "inH2O", "Y"),
//! );
//! let result = Digitizer::default().digitize(&image, &request).unwrap();
//!
//! // nothing drawn: synthetic axes, no curve, nothing to export
//! assert!(result.diagnostics.is_degraded());
//! assert!(!result.chart.validate());
//! ```

pub mod axis;
pub mod curve;
mod error;
pub mod export;
pub mod model;
mod options;
mod pipeline;
pub mod refine;
pub mod session;
pub mod transform;
pub mod units;

pub use axis::{AxisDetection, AxisLines, AxisOptions, detect_axes};
pub use curve::{CurveDetection, CurveOptions, CurveStrategy, detect_curve};
pub use error::{CalibrationError, DigitizeError, DigitizeResult, Stage, StageError};
pub use export::{preview, save_csv, to_rows, write_csv};
pub use model::{Axis, ChartData, Series, ValidationError};
pub use options::{AxisMode, DigitizeOptions, load_options};
pub use pipeline::{Diagnostics, DigitizeRequest, Digitization, Digitizer};
pub use refine::{RefineOptions, Resample, refine};
pub use session::{Commit, Session, Ticket};
pub use transform::{AxisCalibration, AxisMapping, clamp_to_axes, to_value_space};
pub use units::{Unit, UnitError, convert, convert_chart};
