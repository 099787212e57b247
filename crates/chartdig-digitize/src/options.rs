//! Digitizer configuration
//!
//! [`DigitizeOptions`] groups the tunables of every stage. It reads from
//! JSON: each nested table may be partial, and the three top-level
//! shortcuts (`threshold`, `smoothingWindow`, `sampleCount`) override the
//! matching nested field when present.
//!
//! ```
//! use chartdig_digitize::{AxisMode, DigitizeOptions};
//!
//! let opts = DigitizeOptions::from_json_str(r#"{"threshold": 100, "axisMode": "manual"}"#).unwrap();
//! assert_eq!(opts.preprocess_options().threshold, 100);
//! assert_eq!(opts.axis_mode, AxisMode::Manual);
//! assert_eq!(opts.refine_options().smoothing_window, 5);
//! ```

use crate::axis::AxisOptions;
use crate::curve::CurveOptions;
use crate::error::DigitizeResult;
use crate::refine::RefineOptions;
use chartdig_filter::PreprocessOptions;
use chartdig_region::{DEFAULT_READY_TIMEOUT, HoughParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Where the axis lines come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisMode {
    /// Detect the axes in the image
    #[default]
    Auto,
    /// Use the axis lines supplied with the request
    Manual,
}

/// Options for a [`Digitizer`](crate::Digitizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitizeOptions {
    /// Overrides `preprocess.threshold`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,
    /// Overrides `refine.smoothing_window`
    #[serde(alias = "smoothingWindow", skip_serializing_if = "Option::is_none")]
    pub smoothing_window: Option<usize>,
    /// Overrides `curve.sample_count`
    #[serde(alias = "sampleCount", skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<usize>,
    #[serde(alias = "axisMode")]
    pub axis_mode: AxisMode,
    /// Longest wait for the vision engine, in milliseconds
    #[serde(alias = "engineTimeoutMs")]
    pub engine_timeout_ms: u64,
    pub preprocess: PreprocessOptions,
    pub hough: HoughParams,
    pub axis: AxisOptions,
    pub curve: CurveOptions,
    pub refine: RefineOptions,
}

impl Default for DigitizeOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            smoothing_window: None,
            sample_count: None,
            axis_mode: AxisMode::Auto,
            engine_timeout_ms: DEFAULT_READY_TIMEOUT.as_millis() as u64,
            preprocess: PreprocessOptions::default(),
            hough: HoughParams::default(),
            axis: AxisOptions::default(),
            curve: CurveOptions::default(),
            refine: RefineOptions::default(),
        }
    }
}

impl DigitizeOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> DigitizeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> DigitizeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }

    /// Preprocessor options with the top-level threshold applied.
    pub fn preprocess_options(&self) -> PreprocessOptions {
        let mut opts = self.preprocess.clone();
        if let Some(t) = self.threshold {
            opts.threshold = t;
        }
        opts
    }

    /// Curve options with the top-level sample count applied.
    pub fn curve_options(&self) -> CurveOptions {
        let mut opts = self.curve.clone();
        if let Some(n) = self.sample_count {
            opts.sample_count = n;
        }
        opts
    }

    /// Refiner options with the top-level smoothing window applied.
    pub fn refine_options(&self) -> RefineOptions {
        let mut opts = self.refine.clone();
        if let Some(w) = self.smoothing_window {
            opts.smoothing_window = w;
        }
        opts
    }
}

/// Load options from a JSON file.
pub fn load_options<P: AsRef<Path>>(path: P) -> DigitizeResult<DigitizeOptions> {
    let text = std::fs::read_to_string(path)?;
    DigitizeOptions::from_json_str(&text)
}
