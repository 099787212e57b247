//! Presentation units for flow and pressure axes
//!
//! Conversion is a scalar multiply applied to calibrated values. It never
//! touches the pixel-to-value calibration.

use crate::model::{Axis, ChartData};
use chartdig_core::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Cubic metres per minute in one cubic foot per minute.
pub const CFM_TO_M3_PER_MIN: f64 = 0.028316847;
/// Millimetres in one inch.
pub const INCH_TO_MM: f64 = 25.4;
/// Pascals in one millimetre of water column.
pub const MMH2O_TO_PA: f64 = 9.80665;

/// Physical quantity measured by a [`Unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Flow,
    Pressure,
}

/// Supported axis units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Cubic feet per minute
    Cfm,
    CubicMeterPerMinute,
    CubicMeterPerHour,
    /// Inches of water column
    InchH2O,
    /// Millimetres of water column
    MillimeterH2O,
    Pascal,
}

/// Unit conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },

    #[error("unknown unit: {0:?}")]
    Unknown(String),
}

impl Unit {
    pub fn quantity(self) -> Quantity {
        match self {
            Unit::Cfm | Unit::CubicMeterPerMinute | Unit::CubicMeterPerHour => Quantity::Flow,
            Unit::InchH2O | Unit::MillimeterH2O | Unit::Pascal => Quantity::Pressure,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Cfm => "CFM",
            Unit::CubicMeterPerMinute => "m³/min",
            Unit::CubicMeterPerHour => "m³/h",
            Unit::InchH2O => "inH2O",
            Unit::MillimeterH2O => "mmH2O",
            Unit::Pascal => "Pa",
        }
    }

    /// Size of one unit in the quantity's base unit (m³/min or Pa).
    fn to_base(self) -> f64 {
        match self {
            Unit::Cfm => CFM_TO_M3_PER_MIN,
            Unit::CubicMeterPerMinute => 1.0,
            Unit::CubicMeterPerHour => 1.0 / 60.0,
            Unit::InchH2O => INCH_TO_MM * MMH2O_TO_PA,
            Unit::MillimeterH2O => MMH2O_TO_PA,
            Unit::Pascal => 1.0,
        }
    }

    /// Multiplier taking a value in `self` to a value in `to`.
    pub fn factor_to(self, to: Unit) -> Result<f64, UnitError> {
        if self.quantity() != to.quantity() {
            return Err(UnitError::Incompatible { from: self, to });
        }
        Ok(self.to_base() / to.to_base())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '³' { '3' } else { c.to_ascii_lowercase() })
            .collect();
        let unit = match key.as_str() {
            "cfm" | "ft3/min" => Unit::Cfm,
            "m3/min" | "cmm" | "cubic_meter_per_minute" => Unit::CubicMeterPerMinute,
            "m3/h" | "m3/hr" | "cmh" | "cubic_meter_per_hour" => Unit::CubicMeterPerHour,
            "inh2o" | "inchh2o" | "inwc" | "inch_h2o" => Unit::InchH2O,
            "mmh2o" | "mmaq" | "mmwc" | "millimeter_h2o" => Unit::MillimeterH2O,
            "pa" | "pascal" => Unit::Pascal,
            _ => return Err(UnitError::Unknown(s.to_string())),
        };
        Ok(unit)
    }
}

/// Convert a single value.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    Ok(value * from.factor_to(to)?)
}

fn rescale_axis(axis: &Axis, to: Unit) -> Result<(Axis, f64), UnitError> {
    let from: Unit = axis.unit.parse()?;
    let k = from.factor_to(to)?;
    let axis = Axis {
        min: axis.min * k,
        max: axis.max * k,
        scale: axis.scale * k,
        unit: to.symbol().to_string(),
        label: axis.label.clone(),
        grid_lines: axis
            .grid_lines
            .as_ref()
            .map(|g| g.iter().map(|v| v * k).collect()),
        is_inverted: axis.is_inverted,
    };
    Ok((axis, k))
}

/// Re-express a chart in other units.
///
/// The axes' current units are parsed from [`Axis::unit`]. Factors are
/// positive, so point order and bounds are preserved.
pub fn convert_chart(chart: &ChartData, x_unit: Unit, y_unit: Unit) -> Result<ChartData, UnitError> {
    let (x_axis, kx) = rescale_axis(&chart.x_axis, x_unit)?;
    let (y_axis, ky) = rescale_axis(&chart.y_axis, y_unit)?;
    let map = |pts: &[Point]| -> Vec<Point> {
        pts.iter().map(|p| Point::new(p.x * kx, p.y * ky)).collect()
    };

    let mut out = ChartData::new(x_axis, y_axis, map(&chart.points));
    out.series = chart
        .series
        .iter()
        .map(|s| crate::model::Series {
            name: s.name.clone(),
            points: map(&s.points),
            color: s.color.clone(),
        })
        .collect();
    Ok(out)
}
