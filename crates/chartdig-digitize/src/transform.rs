//! Pixel space to value space
//!
//! An [`AxisMapping`] pairs a declared [`Axis`] with the pixel range it
//! occupies. [`to_value_space`] is the single place where pixel points
//! become chart values.

use crate::axis::AxisLines;
use crate::error::CalibrationError;
use crate::model::{Axis, ChartData};
use chartdig_core::Point;

/// Pixel ranges narrower than this are treated as empty.
const MIN_PIXEL_SPAN: f64 = 1e-9;

/// Linear mapping between one pixel coordinate and one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMapping {
    axis: Axis,
    pixel_min: f64,
    pixel_max: f64,
}

impl AxisMapping {
    /// Build a mapping, setting `axis.scale` to value units per pixel.
    ///
    /// The pixel range may be given in either order.
    pub fn new(name: &'static str, mut axis: Axis, pixels: (f64, f64)) -> Result<Self, CalibrationError> {
        if !axis.is_ordered() {
            return Err(CalibrationError::AxisNotOrdered {
                axis: name,
                min: axis.min,
                max: axis.max,
            });
        }
        let (a, b) = pixels;
        let (pixel_min, pixel_max) = if a <= b { (a, b) } else { (b, a) };
        let span = pixel_max - pixel_min;
        if !(span > MIN_PIXEL_SPAN) || !span.is_finite() {
            return Err(CalibrationError::ZeroPixelRange {
                axis: name,
                from: a,
                to: b,
            });
        }
        axis.scale = axis.span() / span;
        Ok(Self {
            axis,
            pixel_min,
            pixel_max,
        })
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn pixel_range(&self) -> (f64, f64) {
        (self.pixel_min, self.pixel_max)
    }

    /// Value at a pixel coordinate, unclamped.
    #[inline]
    pub fn to_value(&self, pixel: f64) -> f64 {
        let offset = (pixel - self.pixel_min) * self.axis.scale;
        if self.axis.is_inverted {
            self.axis.max - offset
        } else {
            self.axis.min + offset
        }
    }

    /// Pixel coordinate of a value.
    #[inline]
    pub fn to_pixel(&self, value: f64) -> f64 {
        let offset = if self.axis.is_inverted {
            self.axis.max - value
        } else {
            value - self.axis.min
        };
        self.pixel_min + offset / self.axis.scale
    }
}

/// Calibration of both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCalibration {
    pub x: AxisMapping,
    pub y: AxisMapping,
}

impl AxisCalibration {
    pub fn new(
        x_axis: Axis,
        x_pixels: (f64, f64),
        y_axis: Axis,
        y_pixels: (f64, f64),
    ) -> Result<Self, CalibrationError> {
        Ok(Self {
            x: AxisMapping::new("x", x_axis, x_pixels)?,
            y: AxisMapping::new("y", y_axis, y_pixels)?,
        })
    }

    /// Calibrate against detected axis lines.
    ///
    /// Image rows grow downward, so the y axis is always marked inverted.
    pub fn from_lines(lines: &AxisLines, x_axis: Axis, y_axis: Axis) -> Result<Self, CalibrationError> {
        let (xr, yr) = lines.pixel_ranges();
        Self::new(x_axis, xr, y_axis.inverted(), yr)
    }

    /// Map one point without clamping.
    #[inline]
    pub fn map_point(&self, p: &Point) -> Point {
        Point::new(self.x.to_value(p.x), self.y.to_value(p.y))
    }

    /// Value-space chart for a pixel-space point sequence.
    pub fn to_chart(&self, pixels: &[Point]) -> ChartData {
        ChartData::new(
            self.x.axis().clone(),
            self.y.axis().clone(),
            to_value_space(pixels, self),
        )
    }
}

/// Map pixel points into value space.
///
/// Non-finite points and points outside both axis ranges are dropped; the
/// rest are clamped into the axis bounds. The result is sorted by x and,
/// where clamping made two points share an x, the first is kept.
pub fn to_value_space(points: &[Point], calibration: &AxisCalibration) -> Vec<Point> {
    let x_axis = calibration.x.axis();
    let y_axis = calibration.y.axis();

    let mut out: Vec<Point> = points
        .iter()
        .map(|p| calibration.map_point(p))
        .filter(|v| v.is_finite() && (x_axis.contains(v.x) || y_axis.contains(v.y)))
        .map(|v| Point::new(x_axis.clamp(v.x), y_axis.clamp(v.y)))
        .collect();

    out.sort_by(|a, b| a.x.total_cmp(&b.x));
    out.dedup_by(|later, earlier| later.x == earlier.x);
    out
}

/// Clamp value-space points sorted by x onto the calibrated axes.
///
/// Points that clamp onto the same x keep the first.
pub fn clamp_to_axes(points: &[Point], calibration: &AxisCalibration) -> Vec<Point> {
    let x_axis = calibration.x.axis();
    let y_axis = calibration.y.axis();

    let mut out: Vec<Point> = points
        .iter()
        .map(|v| Point::new(x_axis.clamp(v.x), y_axis.clamp(v.y)))
        .collect();
    out.dedup_by(|later, earlier| later.x == earlier.x);
    out
}
