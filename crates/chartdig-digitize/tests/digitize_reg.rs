//! Digitization regression test
//!
//! Draws a synthetic fan curve `y = 8 - 0.05 x` on L-shaped axes and runs
//! the full pipeline with both curve strategies.

use chartdig_digitize::{
    Axis, ChartData, CurveStrategy, DigitizeOptions, DigitizeRequest, Digitizer, Resample, Unit, export,
};
use chartdig_test::synth::PlotArea;
use chartdig_test::{ChartImage, RegParams};

const AREA: PlotArea = PlotArea {
    origin_x: 40,
    origin_y: 260,
    x_end: 380,
    y_top: 20,
    x_range: (0.0, 100.0),
    y_range: (0.0, 10.0),
};

fn fan(x: f64) -> f64 {
    8.0 - 0.05 * x
}

fn request() -> DigitizeRequest {
    DigitizeRequest::new(Axis::new(0.0, 100.0, "CFM", "Q"), Axis::new(0.0, 10.0, "inH2O", "P"))
}

fn worst_error(chart: &ChartData) -> f64 {
    chart
        .points
        .iter()
        .map(|p| (p.y - fan(p.x)).abs())
        .fold(0.0, f64::max)
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn digitize_contour_reg() {
    init_logger();
    let mut rp = RegParams::new("digitize_contour");

    // the disc is larger than the curve stroke but round
    let pix = ChartImage::new(400, 300)
        .axes(&AREA, 3)
        .function(&AREA, 10.0, 90.0, fan, 20, 7)
        .disc(330, 60, 30)
        .build();
    let result = Digitizer::default().digitize(&pix, &request()).expect("digitize");
    let chart = &result.chart;
    let diag = &result.diagnostics;
    eprintln!("  {:?}", diag);

    // --- Test 1: axes were detected, not synthesized ---
    rp.compare_bool(false, diag.is_degraded());
    rp.compare_values(260.0, result.axes.x_axis_row(), 1.5);
    rp.compare_values(40.0, result.axes.y_axis_column(), 1.5);

    // --- Test 2: the stroke was chosen over the disc ---
    rp.compare_bool(true, diag.curve_found);
    rp.compare_bool(true, chart.validate());
    rp.compare_bool(true, chart.points.len() >= 50);
    rp.compare_values(0.0, worst_error(chart), 0.3);

    // --- Test 3: the curve spans the drawn range ---
    if let (Some(first), Some(last)) = (chart.points.first(), chart.points.last()) {
        rp.compare_values(10.0, first.x, 2.0);
        rp.compare_values(90.0, last.x, 2.0);
    }

    // --- Test 4: export rows ---
    let rows = export::to_rows(chart).expect("rows");
    rp.compare_strings(b"CFM", rows[0][1].as_bytes());
    rp.compare_values((chart.points.len() + 4) as f64, rows.len() as f64, 0.0);
    let mut csv = Vec::new();
    export::write_csv(chart, &mut csv).expect("csv");
    rp.write_data_and_check(&csv, "csv").expect("write csv");

    assert!(rp.cleanup(), "digitize_contour regression test failed");
}

#[test]
fn digitize_heuristics_reg() {
    init_logger();
    let mut rp = RegParams::new("digitize_heuristics");

    let pix = ChartImage::new(400, 300)
        .axes(&AREA, 3)
        .function(&AREA, 10.0, 90.0, fan, 20, 7)
        .disc(330, 60, 30)
        .build();

    // --- Test 1: without the roundness gate the disc wins on area ---
    let mut opts = DigitizeOptions::default();
    opts.curve.max_circularity = None;
    let result = Digitizer::new(opts).digitize(&pix, &request()).expect("digitize");
    rp.compare_bool(true, result.diagnostics.curve_found);
    rp.compare_bool(true, worst_error(&result.chart) > 1.0);

    // --- Test 2: perimeter/area alone cannot tell the two apart ---
    let mut opts = DigitizeOptions::default();
    opts.curve.max_circularity = None;
    opts.curve.max_perimeter_ratio = Some(1.0);
    let result = Digitizer::new(opts).digitize(&pix, &request()).expect("digitize");
    rp.compare_bool(true, worst_error(&result.chart) > 1.0);

    // --- Test 3: both gates together pick the stroke ---
    let mut opts = DigitizeOptions::default();
    opts.curve.max_perimeter_ratio = Some(1.0);
    let result = Digitizer::new(opts).digitize(&pix, &request()).expect("digitize");
    rp.compare_values(0.0, worst_error(&result.chart), 0.3);

    assert!(rp.cleanup(), "digitize_heuristics regression test failed");
}

#[test]
fn digitize_column_scan_reg() {
    init_logger();
    let mut rp = RegParams::new("digitize_column_scan");

    let pix = ChartImage::new(400, 300)
        .axes(&AREA, 3)
        .function(&AREA, 10.0, 90.0, fan, 20, 5)
        .build();
    let opts = DigitizeOptions::from_json_str(r#"{"curve": {"strategy": "column_scan"}}"#).expect("options");
    assert_eq!(opts.curve.strategy, CurveStrategy::ColumnScan);
    let result = Digitizer::new(opts).digitize(&pix, &request()).expect("digitize");
    let chart = &result.chart;

    // --- Test 1: one sample per 5-pixel column over the curve ---
    rp.compare_bool(true, result.diagnostics.curve_found);
    rp.compare_values(55.0, chart.points.len() as f64, 3.0);
    rp.compare_bool(true, chart.validate());

    // --- Test 2: samples sit on the stroke centre ---
    rp.compare_values(0.0, worst_error(chart), 0.2);

    // --- Test 3: resampling onto a value grid ---
    let mut opts = DigitizeOptions::default();
    opts.curve.strategy = CurveStrategy::ColumnScan;
    opts.refine.resample = Resample::Grid(vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    let result = Digitizer::new(opts).digitize(&pix, &request()).expect("digitize");
    let pts = &result.chart.points;
    rp.compare_values(6.0, pts.len() as f64, 0.0);
    if pts.len() == 6 {
        // inside the drawn range the curve is interpolated
        rp.compare_values(fan(20.0), pts[1].y, 0.2);
        rp.compare_values(fan(80.0), pts[4].y, 0.2);
        // outside it the nearest endpoint is held
        rp.compare_values(fan(10.0), pts[0].y, 0.2);
        rp.compare_values(fan(90.0), pts[5].y, 0.2);
    }
    rp.compare_bool(true, result.chart.validate());

    // --- Test 4: metric output units ---
    let mut opts = DigitizeOptions::default();
    opts.curve.strategy = CurveStrategy::ColumnScan;
    let req = request().with_output_units(Unit::CubicMeterPerMinute, Unit::MillimeterH2O);
    let metric = Digitizer::new(opts).digitize(&pix, &req).expect("digitize").chart;
    rp.compare_strings(b"mmH2O", metric.y_axis.unit.as_bytes());
    rp.compare_values(254.0, metric.y_axis.max, 1e-9);
    rp.compare_values(chart.points.len() as f64, metric.points.len() as f64, 0.0);
    if let (Some(a), Some(b)) = (chart.points.get(10), metric.points.get(10)) {
        rp.compare_values(a.x * 0.028316847, b.x, 1e-9);
        rp.compare_values(a.y * 25.4, b.y, 1e-9);
    }
    rp.compare_bool(true, metric.validate());

    assert!(rp.cleanup(), "digitize_column_scan regression test failed");
}
