//! Calibration and recovery scenarios
//!
//! Uses a scripted engine behind the vision seam so that the detected
//! lines and contours are exactly known.

use chartdig_core::{Contour, LineSegment, Pix, PixelPoint, Point};
use chartdig_digitize::{
    Axis, AxisCalibration, AxisLines, AxisMode, DigitizeOptions, DigitizeRequest, Digitizer,
    Resample, ValidationError, export, to_value_space,
};
use chartdig_region::{EngineHandle, HoughParams, RegionResult, VisionEngine};
use chartdig_test::{ChartImage, RegParams};
use std::sync::Arc;

struct Scripted {
    lines: Vec<LineSegment>,
    contours: Vec<Contour>,
}

impl VisionEngine for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn detect_lines(&self, _edges: &Pix, _params: &HoughParams) -> RegionResult<Vec<LineSegment>> {
        Ok(self.lines.clone())
    }

    fn detect_contours(&self, _edges: &Pix) -> RegionResult<Vec<Contour>> {
        Ok(self.contours.clone())
    }
}

fn scripted(lines: Vec<LineSegment>, contours: Vec<Contour>) -> EngineHandle {
    EngineHandle::ready(Arc::new(Scripted { lines, contours }))
}

/// Closed border of the pixel rectangle `x0..=x1` by `y0..=y1`.
fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Contour {
    let mut pts = Vec::new();
    pts.extend((x0..x1).map(|x| PixelPoint::new(x, y0)));
    pts.extend((y0..y1).map(|y| PixelPoint::new(x1, y)));
    pts.extend((x0 + 1..=x1).rev().map(|x| PixelPoint::new(x, y1)));
    pts.extend((y0 + 1..=y1).rev().map(|y| PixelPoint::new(x0, y)));
    Contour::new(pts)
}

fn request() -> DigitizeRequest {
    DigitizeRequest::new(Axis::new(0.0, 40.0, "CFM", "X"), Axis::new(0.0, 10.0, "inH2O", "Y"))
}

fn reference_lines() -> AxisLines {
    AxisLines::new(LineSegment::new(0, 180, 400, 180), LineSegment::new(20, 0, 20, 200))
}

#[test]
fn calibration_scenario_reg() {
    let mut rp = RegParams::new("calibration_scenario");

    // --- Test 1: pixel (220, 90) maps to (22, 5) ---
    let req = request();
    let cal = AxisCalibration::from_lines(&reference_lines(), req.x_axis.clone(), req.y_axis.clone())
        .expect("calibration");
    let v = to_value_space(&[Point::new(220.0, 90.0)], &cal);
    rp.compare_points(&[Point::new(22.0, 5.0)], &v, 1e-9);

    // --- Test 2: same mapping through the pipeline in manual mode ---
    let opts = DigitizeOptions {
        axis_mode: AxisMode::Manual,
        ..Default::default()
    };
    let engine = scripted(Vec::new(), vec![rect(180, 88, 260, 92)]);
    let image = ChartImage::new(400, 300).build();
    let result = Digitizer::with_engine(engine, opts)
        .digitize(&image, &request().with_manual_axes(reference_lines()))
        .expect("digitize");
    let chart = &result.chart;
    rp.compare_bool(true, chart.validate());
    rp.compare_values(18.0, chart.points[0].x, 1e-9);
    rp.compare_values(26.0, chart.points[chart.points.len() - 1].x, 1e-9);
    let at_22 = chart.points.iter().find(|p| (p.x - 22.0).abs() < 1e-9);
    rp.compare_bool(true, at_22.is_some());
    if let Some(p) = at_22 {
        rp.compare_values(5.0, p.y, 1e-9);
    }

    // --- Test 3: grid positions beyond the x axis land on its bounds ---
    let mut opts = DigitizeOptions {
        axis_mode: AxisMode::Manual,
        ..Default::default()
    };
    opts.refine.resample = Resample::Grid(vec![-5.0, 20.0, 22.0, 50.0]);
    let engine = scripted(Vec::new(), vec![rect(180, 88, 260, 92)]);
    let result = Digitizer::with_engine(engine, opts)
        .digitize(&image, &request().with_manual_axes(reference_lines()))
        .expect("digitize with grid");
    let chart = &result.chart;
    rp.compare_bool(true, chart.validate());
    rp.compare_points(
        &[
            Point::new(0.0, 5.0),
            Point::new(20.0, 5.0),
            Point::new(22.0, 5.0),
            Point::new(40.0, 5.0),
        ],
        &chart.points,
        1e-6,
    );
    rp.compare_bool(true, export::to_rows(chart).is_ok());

    assert!(rp.cleanup(), "calibration_scenario regression test failed");
}

#[test]
fn fallback_scenario_reg() {
    let mut rp = RegParams::new("fallback_scenario");

    // one horizontal candidate, two vertical ones
    let engine = scripted(
        vec![
            LineSegment::new(0, 180, 400, 180),
            LineSegment::new(20, 0, 20, 200),
            LineSegment::new(21, 0, 21, 200),
        ],
        Vec::new(),
    );
    let image = ChartImage::new(400, 300).build();
    let result = Digitizer::with_engine(engine, DigitizeOptions::default())
        .digitize(&image, &request())
        .expect("digitize");
    let diag = &result.diagnostics;

    // --- Test 1: the x axis falls back to h - 20 across the full width ---
    rp.compare_bool(true, diag.x_axis_fallback);
    rp.compare_bool(false, diag.y_axis_fallback);
    rp.compare_values(1.0, diag.x_candidates as f64, 0.0);
    rp.compare_bool(true, result.axes.x == LineSegment::new(0, 280, 400, 280));
    rp.compare_bool(true, result.axes.y == LineSegment::new(20, 0, 20, 200));
    let (xp0, xp1) = result.calibration.x.pixel_range();
    rp.compare_values(0.0, xp0, 0.0);
    rp.compare_values(400.0, xp1, 0.0);

    // --- Test 2: no contour, so nothing to export ---
    rp.compare_bool(false, diag.curve_found);
    rp.compare_bool(true, result.chart.points.is_empty());
    rp.compare_bool(false, result.chart.validate());
    rp.compare_bool(
        true,
        export::to_rows(&result.chart) == Err(ValidationError::NoDataExtracted),
    );

    assert!(rp.cleanup(), "fallback_scenario regression test failed");
}

#[test]
fn curve_not_found_reg() {
    let mut rp = RegParams::new("curve_not_found");

    // specks only: every region is below the minimum area
    let image = ChartImage::new(300, 200).noise(25, 4, 11).build();
    let result = Digitizer::default().digitize(&image, &request()).expect("digitize");

    rp.compare_bool(false, result.diagnostics.curve_found);
    rp.compare_bool(true, result.diagnostics.is_degraded());
    rp.compare_bool(false, result.chart.validate());
    let mut out = Vec::new();
    rp.compare_bool(true, export::write_csv(&result.chart, &mut out).is_err());
    rp.compare_bool(true, out.is_empty());

    assert!(rp.cleanup(), "curve_not_found regression test failed");
}
