//! The digitization pipeline
//!
//! ```text
//! image -> preprocess -> edges -> axis calibration -> calibration
//!                             \-> curve extraction -> refine -> value space
//! ```
//!
//! A [`Digitizer`] is reusable and holds no per-request state: every call
//! owns its edge map and point buffers.

use crate::axis::{self, AxisDetection, AxisLines};
use crate::curve::{self, CurveStrategy};
use crate::error::{CalibrationError, DigitizeError, DigitizeResult, Stage};
use crate::model::{Axis, ChartData};
use crate::options::{AxisMode, DigitizeOptions};
use crate::refine::{self, RefineOptions, Resample};
use crate::transform::{AxisCalibration, clamp_to_axes, to_value_space};
use crate::units::{Unit, convert_chart};
use chartdig_core::Pix;
use chartdig_filter::preprocess;
use chartdig_region::EngineHandle;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Declared axes and optional hints for one digitization.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitizeRequest {
    pub x_axis: Axis,
    /// Marked inverted during calibration
    pub y_axis: Axis,
    /// Axis lines for [`AxisMode::Manual`]
    pub manual_axes: Option<AxisLines>,
    /// Re-express the output in these `(x, y)` units
    pub output_units: Option<(Unit, Unit)>,
}

impl DigitizeRequest {
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            x_axis,
            y_axis,
            manual_axes: None,
            output_units: None,
        }
    }

    pub fn with_manual_axes(mut self, lines: AxisLines) -> Self {
        self.manual_axes = Some(lines);
        self
    }

    pub fn with_output_units(mut self, x: Unit, y: Unit) -> Self {
        self.output_units = Some((x, y));
        self
    }
}

/// What happened along the way, including recovered conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagnostics {
    pub engine: String,
    pub axis_mode: AxisMode,
    pub curve_strategy: CurveStrategy,
    /// Line segments returned by the engine
    pub segments: usize,
    pub x_candidates: usize,
    pub y_candidates: usize,
    /// The x axis line is synthetic
    pub x_axis_fallback: bool,
    /// The y axis line is synthetic
    pub y_axis_fallback: bool,
    pub curve_found: bool,
    /// Contours examined, or columns scanned
    pub curve_candidates: usize,
    pub raw_points: usize,
    pub refined_points: usize,
    pub output_points: usize,
    pub elapsed: Duration,
}

impl Diagnostics {
    pub fn is_degraded(&self) -> bool {
        self.x_axis_fallback || self.y_axis_fallback
    }
}

/// Result of one digitization.
#[derive(Debug, Clone)]
pub struct Digitization {
    pub chart: ChartData,
    pub calibration: AxisCalibration,
    pub axes: AxisLines,
    /// The binary edge map the detectors ran on
    pub edges: Pix,
    pub diagnostics: Diagnostics,
}

impl Digitization {
    /// The edge map as RGBA bytes, ink black on white.
    pub fn edges_rgba(&self) -> Vec<u8> {
        self.edges.to_rgba_bytes()
    }
}

/// Chart digitizer.
pub struct Digitizer {
    engine: EngineHandle,
    options: DigitizeOptions,
}

impl Default for Digitizer {
    fn default() -> Self {
        Self::new(DigitizeOptions::default())
    }
}

impl Digitizer {
    /// A digitizer on the built-in engine.
    pub fn new(options: DigitizeOptions) -> Self {
        Self::with_engine(EngineHandle::native(), options)
    }

    pub fn with_engine(engine: EngineHandle, options: DigitizeOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &DigitizeOptions {
        &self.options
    }

    /// Digitize a chart image.
    ///
    /// A missing curve or degraded axes do not fail the call; they show up
    /// in [`Digitization::diagnostics`] and as an empty or approximate
    /// chart. Check the chart before exporting it.
    ///
    /// # Errors
    ///
    /// - [`DigitizeError::EngineUnavailable`] when the vision engine is not
    ///   ready within the configured timeout
    /// - [`DigitizeError::Stage`] for failures inside a stage, such as an
    ///   unordered declared axis or manual mode without axis lines
    pub fn digitize(&self, image: &Pix, request: &DigitizeRequest) -> DigitizeResult<Digitization> {
        let start = Instant::now();
        let opts = &self.options;

        let edges = preprocess(image, &opts.preprocess_options())
            .map_err(|e| DigitizeError::at(Stage::Preprocess, e))?;

        let engine = self
            .engine
            .wait_ready(opts.engine_timeout())
            .map_err(|e| DigitizeError::at(Stage::Calibrate, e))?;

        let detection = match opts.axis_mode {
            AxisMode::Auto => axis::detect_axes(engine.as_ref(), &edges, &opts.axis, &opts.hough)
                .map_err(|e| DigitizeError::at(Stage::Calibrate, e))?,
            AxisMode::Manual => {
                let lines = request
                    .manual_axes
                    .ok_or_else(|| DigitizeError::at(Stage::Calibrate, CalibrationError::MissingManualAxes))?;
                AxisDetection {
                    lines,
                    x_fallback: false,
                    y_fallback: false,
                    x_candidates: 0,
                    y_candidates: 0,
                    segments: 0,
                }
            }
        };
        let calibration =
            AxisCalibration::from_lines(&detection.lines, request.x_axis.clone(), request.y_axis.clone())
                .map_err(|e| DigitizeError::at(Stage::Calibrate, e))?;

        let curve_opts = opts.curve_options();
        let curve = curve::detect_curve(engine.as_ref(), &edges, &detection.lines, &curve_opts)
            .map_err(|e| DigitizeError::at(Stage::Extract, e))?;

        // resampling positions are value-space, so it runs after the transform
        let refine_opts = opts.refine_options();
        let refined = refine::refine(
            &curve.points,
            &RefineOptions {
                resample: Resample::None,
                ..refine_opts.clone()
            },
        );
        let values = refine::resample(&to_value_space(&refined, &calibration), &refine_opts.resample);
        let values = clamp_to_axes(&values, &calibration);

        let mut chart = ChartData::new(
            calibration.x.axis().clone(),
            calibration.y.axis().clone(),
            values,
        );
        if let Some((xu, yu)) = request.output_units {
            chart = convert_chart(&chart, xu, yu).map_err(|e| DigitizeError::at(Stage::Transform, e))?;
        }

        let diagnostics = Diagnostics {
            engine: engine.name().to_string(),
            axis_mode: opts.axis_mode,
            curve_strategy: curve_opts.strategy,
            segments: detection.segments,
            x_candidates: detection.x_candidates,
            y_candidates: detection.y_candidates,
            x_axis_fallback: detection.x_fallback,
            y_axis_fallback: detection.y_fallback,
            curve_found: curve.found(),
            curve_candidates: curve.candidates,
            raw_points: curve.points.len(),
            refined_points: refined.len(),
            output_points: chart.points.len(),
            elapsed: start.elapsed(),
        };
        log::debug!(
            "digitize: {}x{} -> {} points in {:.1?}{}",
            image.width(),
            image.height(),
            diagnostics.output_points,
            diagnostics.elapsed,
            if diagnostics.is_degraded() { " (degraded axes)" } else { "" }
        );

        Ok(Digitization {
            chart,
            calibration,
            axes: detection.lines,
            edges,
            diagnostics,
        })
    }

    /// Digitize a tightly packed RGBA raster.
    pub fn digitize_rgba(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
        request: &DigitizeRequest,
    ) -> DigitizeResult<Digitization> {
        let pix = Pix::from_rgba_bytes(width, height, rgba)
            .map_err(|e| DigitizeError::InvalidImage(e.to_string()))?;
        self.digitize(&pix, request)
    }
}
