//! Axis calibration from detected line segments
//!
//! Segments from the vision engine are classified as horizontal or
//! vertical, filtered by where a chart's axes normally sit (x along the
//! bottom, y along the left edge), and the longest survivor of each class
//! becomes the axis line. When too few segments qualify, a synthetic line
//! inset from the image border stands in and the detection is flagged as
//! degraded.

use chartdig_core::{LineSegment, Pix};
use chartdig_region::{HoughParams, RegionResult, VisionEngine};
use serde::{Deserialize, Serialize};

/// Rows by which the x axis may miss the bottom of the y line and still
/// count as meeting it at the origin.
const AXIS_JOIN_TOLERANCE: i32 = 8;

/// Axis calibrator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    /// Largest deviation from horizontal/vertical, in degrees
    pub angle_tolerance_deg: f64,
    /// X candidates must have their midpoint below `lower_fraction * height`
    pub lower_fraction: f64,
    /// Y candidates must have their midpoint left of `left_fraction * width`
    pub left_fraction: f64,
    /// Candidates must span this fraction of the matching image dimension
    pub min_span_fraction: f64,
    /// Fewer qualifying segments than this triggers the fallback line
    pub min_candidates: usize,
    /// Distance of fallback lines from the image border
    pub inset: u32,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: 10.0,
            lower_fraction: 0.5,
            left_fraction: 0.2,
            min_span_fraction: 0.3,
            min_candidates: 2,
            inset: 20,
        }
    }
}

/// The two axis lines in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLines {
    pub x: LineSegment,
    pub y: LineSegment,
}

impl AxisLines {
    pub fn new(x: LineSegment, y: LineSegment) -> Self {
        Self { x, y }
    }

    /// Pixel row of the x axis.
    pub fn x_axis_row(&self) -> f64 {
        self.x.midpoint().y
    }

    /// Pixel column of the y axis.
    pub fn y_axis_column(&self) -> f64 {
        self.y.midpoint().x
    }

    /// Pixel ranges `((x_from, x_to), (y_from, y_to))` covered by the axes.
    ///
    /// The x range is the horizontal extent of the x line. The y range runs
    /// from the top of the y line down to the x axis row when the two lines
    /// meet, otherwise it is the full vertical extent of the y line. Both
    /// ranges are ascending in pixel coordinates.
    pub fn pixel_ranges(&self) -> ((f64, f64), (f64, f64)) {
        let (x0, x1) = self.x.x_extent();
        let (top, bottom) = self.y.y_extent();
        let row = self.x_axis_row();
        let y_to = if row > top as f64 && row <= (bottom + AXIS_JOIN_TOLERANCE) as f64 {
            row
        } else {
            bottom as f64
        };
        ((x0 as f64, x1 as f64), (top as f64, y_to))
    }
}

/// Outcome of [`detect_axes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDetection {
    pub lines: AxisLines,
    /// The x line is synthetic
    pub x_fallback: bool,
    /// The y line is synthetic
    pub y_fallback: bool,
    pub x_candidates: usize,
    pub y_candidates: usize,
    /// Segments returned by the engine before classification
    pub segments: usize,
}

impl AxisDetection {
    /// Either axis fell back to a synthetic line.
    pub fn is_degraded(&self) -> bool {
        self.x_fallback || self.y_fallback
    }
}

/// Split segments into plausible x and y axis candidates, keeping order.
pub fn classify(
    lines: &[LineSegment],
    width: u32,
    height: u32,
    options: &AxisOptions,
) -> (Vec<LineSegment>, Vec<LineSegment>) {
    let (w, h) = (width as f64, height as f64);
    let tol = options.angle_tolerance_deg;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for line in lines {
        let mid = line.midpoint();
        let len = line.length();
        if line.is_near_horizontal(tol) {
            if mid.y > options.lower_fraction * h && len >= options.min_span_fraction * w {
                xs.push(*line);
            }
        } else if line.is_near_vertical(tol)
            && mid.x < options.left_fraction * w
            && len >= options.min_span_fraction * h
        {
            ys.push(*line);
        }
    }
    (xs, ys)
}

/// Longest segment; among equal lengths the first wins.
pub fn longest(lines: &[LineSegment]) -> Option<LineSegment> {
    lines.iter().skip(1).fold(lines.first().copied(), |best, l| match best {
        Some(b) if l.length() > b.length() => Some(*l),
        other => other,
    })
}

/// Synthetic axis lines `inset` pixels in from the bottom and left edges.
///
/// Each line spans its full image dimension. The inset is clamped below
/// half the dimension so the line stays inside the image.
pub fn fallback_lines(width: u32, height: u32, inset: u32) -> AxisLines {
    let w = width as i32;
    let h = height as i32;
    let inset_x = (inset as i32).min((w - 1) / 2).max(0);
    let inset_y = (inset as i32).min((h - 1) / 2).max(0);
    AxisLines {
        x: LineSegment::new(0, h - inset_y, w, h - inset_y),
        y: LineSegment::new(inset_x, 0, inset_x, h),
    }
}

/// Detect the chart axes in a binary edge map.
///
/// Only engine failures are errors; missing axes are replaced by
/// [`fallback_lines`] and flagged in the result.
pub fn detect_axes(
    engine: &dyn VisionEngine,
    edges: &Pix,
    options: &AxisOptions,
    hough: &HoughParams,
) -> RegionResult<AxisDetection> {
    let (w, h) = (edges.width(), edges.height());
    let lines = engine.detect_lines(edges, hough)?;
    let (xs, ys) = classify(&lines, w, h, options);
    let fallback = fallback_lines(w, h, options.inset);

    let pick = |cands: &[LineSegment], synthetic: LineSegment, name: &str| {
        if cands.len() < options.min_candidates {
            log::warn!(
                "{} axis: {} candidate(s), below {}; using synthetic line {:?}",
                name,
                cands.len(),
                options.min_candidates,
                synthetic
            );
            return (synthetic, true);
        }
        match longest(cands) {
            Some(line) => (line, false),
            None => (synthetic, true),
        }
    };
    let (x, x_fallback) = pick(&xs, fallback.x, "x");
    let (y, y_fallback) = pick(&ys, fallback.y, "y");

    log::debug!(
        "axes: {} segments, {} x / {} y candidates, x {:?}, y {:?}",
        lines.len(),
        xs.len(),
        ys.len(),
        x,
        y
    );
    Ok(AxisDetection {
        lines: AxisLines { x, y },
        x_fallback,
        y_fallback,
        x_candidates: xs.len(),
        y_candidates: ys.len(),
        segments: lines.len(),
    })
}
