//! Tabular export
//!
//! A chart exports as two-column rows: the axis units, a blank separator,
//! a `X`/`Y` header, then one row per point with values rounded to two
//! decimals. Export refuses charts that fail [`ChartData::check`].

use crate::error::DigitizeResult;
use crate::model::{ChartData, ValidationError};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Number of points shown by a default preview.
pub const PREVIEW_POINTS: usize = 5;

/// One exported row.
pub type Row = [String; 2];

fn fixed2(v: f64) -> String {
    format!("{:.2}", v)
}

fn header() -> Row {
    ["X".to_string(), "Y".to_string()]
}

/// All export rows, units first.
pub fn to_rows(chart: &ChartData) -> Result<Vec<Row>, ValidationError> {
    chart.check()?;
    let mut rows = Vec::with_capacity(chart.points.len() + 4);
    rows.push(["X".to_string(), chart.x_axis.unit.clone()]);
    rows.push(["Y".to_string(), chart.y_axis.unit.clone()]);
    rows.push([String::new(), String::new()]);
    rows.push(header());
    rows.extend(chart.points.iter().map(|p| [fixed2(p.x), fixed2(p.y)]));
    Ok(rows)
}

/// Header plus the first `n` points, for display before export.
pub fn preview(chart: &ChartData, n: usize) -> Result<Vec<Row>, ValidationError> {
    chart.check()?;
    let mut rows = vec![header()];
    rows.extend(chart.points.iter().take(n).map(|p| [fixed2(p.x), fixed2(p.y)]));
    Ok(rows)
}

fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

/// Write the export rows as CSV.
pub fn write_csv<W: Write>(chart: &ChartData, mut writer: W) -> DigitizeResult<()> {
    for [a, b] in to_rows(chart)? {
        writeln!(writer, "{},{}", csv_field(&a), csv_field(&b))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the export rows to a CSV file.
pub fn save_csv<P: AsRef<Path>>(chart: &ChartData, path: P) -> DigitizeResult<()> {
    // validate before creating the file
    chart.check()?;
    let file = File::create(path)?;
    write_csv(chart, BufWriter::new(file))
}
