//! Chart data model and validation
//!
//! [`ChartData`] is the pipeline's output: two calibrated axes and the
//! curve points in value space. [`ChartData::check`] enforces the
//! invariants that export relies on.

use chartdig_core::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A calibrated chart axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    /// Value units per pixel
    pub scale: f64,
    pub unit: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_lines: Option<Vec<f64>>,
    /// Pixel coordinate grows opposite to the value (image rows)
    #[serde(default)]
    pub is_inverted: bool,
}

impl Axis {
    /// An axis spanning `min..=max` with unit scale and no grid lines.
    pub fn new(min: f64, max: f64, unit: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            min,
            max,
            scale: 1.0,
            unit: unit.into(),
            label: label.into(),
            grid_lines: None,
            is_inverted: false,
        }
    }

    /// Mark the axis as inverted.
    pub fn inverted(mut self) -> Self {
        self.is_inverted = true;
        self
    }

    pub fn with_grid_lines(mut self, lines: Vec<f64>) -> Self {
        self.grid_lines = Some(lines);
        self
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `min <= v <= max`; false for NaN.
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        (self.min..=self.max).contains(&v)
    }

    #[inline]
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min < self.max
    }
}

/// A named point sequence drawn on the same axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Digitized chart: axes plus value-space points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<Series>,
}

/// Reasons a [`ChartData`] fails validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{axis} axis not ordered: min {min}, max {max}")]
    AxisNotOrdered {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("no data extracted")]
    NoDataExtracted,

    #[error("point {index} ({x}, {y}) outside the axis bounds")]
    PointOutOfBounds { index: usize, x: f64, y: f64 },

    #[error("point {index} x = {x} does not follow previous x = {previous}")]
    NotAscending { index: usize, previous: f64, x: f64 },

    #[error("series {series:?} point {index} outside the axis bounds")]
    SeriesPointOutOfBounds { series: String, index: usize },

    #[error("{axis} grid line {value} outside the axis bounds")]
    GridLineOutOfBounds { axis: &'static str, value: f64 },
}

impl ChartData {
    pub fn new(x_axis: Axis, y_axis: Axis, points: Vec<Point>) -> Self {
        Self {
            x_axis,
            y_axis,
            points,
            series: Vec::new(),
        }
    }

    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        self.x_axis.contains(p.x) && self.y_axis.contains(p.y)
    }

    /// Check every invariant, reporting the first violation.
    pub fn check(&self) -> Result<(), ValidationError> {
        for (name, axis) in [("x", &self.x_axis), ("y", &self.y_axis)] {
            if !axis.is_ordered() {
                return Err(ValidationError::AxisNotOrdered {
                    axis: name,
                    min: axis.min,
                    max: axis.max,
                });
            }
            if let Some(value) = axis
                .grid_lines
                .iter()
                .flatten()
                .copied()
                .find(|&v| !axis.contains(v))
            {
                return Err(ValidationError::GridLineOutOfBounds { axis: name, value });
            }
        }

        if self.points.is_empty() {
            return Err(ValidationError::NoDataExtracted);
        }
        for (index, p) in self.points.iter().enumerate() {
            if !self.contains(p) {
                return Err(ValidationError::PointOutOfBounds {
                    index,
                    x: p.x,
                    y: p.y,
                });
            }
            if index > 0 {
                let previous = self.points[index - 1].x;
                if p.x <= previous {
                    return Err(ValidationError::NotAscending {
                        index,
                        previous,
                        x: p.x,
                    });
                }
            }
        }

        for series in &self.series {
            if let Some(index) = series.points.iter().position(|p| !self.contains(p)) {
                return Err(ValidationError::SeriesPointOutOfBounds {
                    series: series.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// True when [`check`](Self::check) passes.
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(points: Vec<Point>) -> ChartData {
        ChartData::new(
            Axis::new(0.0, 40.0, "CFM", "X"),
            Axis::new(0.0, 10.0, "inH2O", "Y").inverted(),
            points,
        )
    }

    #[test]
    fn test_valid_chart() {
        let c = chart(vec![Point::new(0.0, 10.0), Point::new(20.0, 5.0), Point::new(40.0, 0.0)]);
        assert!(c.validate());
    }

    #[test]
    fn test_empty_points_rejected() {
        assert_eq!(chart(vec![]).check(), Err(ValidationError::NoDataExtracted));
    }

    #[test]
    fn test_order_and_bounds() {
        let dup = chart(vec![Point::new(1.0, 1.0), Point::new(1.0, 2.0)]);
        assert!(matches!(dup.check(), Err(ValidationError::NotAscending { index: 1, .. })));

        let outside = chart(vec![Point::new(1.0, 10.5)]);
        assert!(matches!(outside.check(), Err(ValidationError::PointOutOfBounds { index: 0, .. })));

        let nan = chart(vec![Point::new(f64::NAN, 1.0)]);
        assert!(!nan.validate());
    }

    #[test]
    fn test_axis_and_grid_checks() {
        let mut c = chart(vec![Point::new(1.0, 1.0)]);
        c.y_axis.max = 0.0;
        assert!(matches!(c.check(), Err(ValidationError::AxisNotOrdered { axis: "y", .. })));

        let mut c = chart(vec![Point::new(1.0, 1.0)]);
        c.x_axis = c.x_axis.with_grid_lines(vec![0.0, 20.0, 45.0]);
        assert_eq!(
            c.check(),
            Err(ValidationError::GridLineOutOfBounds { axis: "x", value: 45.0 })
        );
    }

    #[test]
    fn test_series_points_checked() {
        let mut c = chart(vec![Point::new(1.0, 1.0)]);
        c.series.push(Series {
            name: "fan B".into(),
            points: vec![Point::new(2.0, 2.0), Point::new(50.0, 2.0)],
            color: None,
        });
        assert!(matches!(
            c.check(),
            Err(ValidationError::SeriesPointOutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_axis_json_is_camel_case() {
        let json = serde_json::to_string(&Axis::new(0.0, 1.0, "Pa", "Y").inverted()).unwrap();
        assert!(json.contains("\"isInverted\":true"));
        assert!(!json.contains("gridLines"));
    }
}
