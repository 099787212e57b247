//! Curve extraction
//!
//! Two strategies turn an edge map into ordered pixel-space curve samples:
//!
//! - [`CurveStrategy::Contour`] traces every connected region, discards
//!   specks, frames and blobs by area and shape, and samples the border of
//!   the largest survivor.
//! - [`CurveStrategy::ColumnScan`] walks the plot area column by column and
//!   takes the first ink run above the x axis.
//!
//! Finding no curve is not an error: the detection comes back empty.

use crate::axis::AxisLines;
use chartdig_core::{Contour, Pix, Point};
use chartdig_region::{RegionResult, VisionEngine};
use serde::{Deserialize, Serialize};

/// How the curve is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStrategy {
    #[default]
    Contour,
    ColumnScan,
}

/// Curve extractor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveOptions {
    pub strategy: CurveStrategy,
    /// Contours enclosing less area are noise
    pub min_area: f64,
    /// Contours enclosing more than this fraction of the image are frames or fills
    pub max_area_fraction: f64,
    /// Contours rounder than this are markers or blobs
    pub max_circularity: Option<f64>,
    /// Optional upper bound on perimeter / area
    pub max_perimeter_ratio: Option<f64>,
    /// Approximate number of border points to keep
    pub sample_count: usize,
    /// Column spacing for [`CurveStrategy::ColumnScan`]
    pub column_step: u32,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            strategy: CurveStrategy::Contour,
            min_area: 100.0,
            max_area_fraction: 0.3,
            max_circularity: Some(0.5),
            max_perimeter_ratio: None,
            sample_count: 100,
            column_step: 5,
        }
    }
}

impl CurveOptions {
    /// Whether a contour may be the curve in a `width` x `height` image.
    pub fn accepts(&self, contour: &Contour, width: u32, height: u32) -> bool {
        let area = contour.area();
        if area < self.min_area || area > self.max_area_fraction * width as f64 * height as f64 {
            return false;
        }
        if self.max_circularity.is_some_and(|max| contour.circularity() > max) {
            return false;
        }
        if self
            .max_perimeter_ratio
            .is_some_and(|max| contour.perimeter_area_ratio() > max)
        {
            return false;
        }
        true
    }
}

/// Outcome of [`detect_curve`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveDetection {
    /// Pixel-space samples sorted by x
    pub points: Vec<Point>,
    /// Contours examined, or columns scanned
    pub candidates: usize,
    /// Index of the selected contour
    pub selected: Option<usize>,
    pub selected_area: Option<f64>,
}

impl CurveDetection {
    pub fn found(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Largest accepted contour; among equal areas the first wins.
pub fn select_contour(
    contours: &[Contour],
    width: u32,
    height: u32,
    options: &CurveOptions,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in contours.iter().enumerate() {
        if !options.accepts(c, width, height) {
            continue;
        }
        let area = c.area();
        if best.is_none_or(|(_, a)| area > a) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}

/// Every `max(1, len / sample_count)`-th border point, stably sorted by x.
pub fn sample_contour(contour: &Contour, sample_count: usize) -> Vec<Point> {
    let stride = (contour.len() / sample_count.max(1)).max(1);
    let mut points: Vec<Point> = contour
        .points()
        .iter()
        .step_by(stride)
        .map(|&p| p.into())
        .collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}

/// Column scan between the axes.
///
/// Columns run from the y axis to the right end of the x axis every
/// `step` pixels. In each column the scan starts on the x axis row, climbs
/// past the axis stroke, and records the centre of the next ink run
/// below the top of the y axis. Columns without such a run are skipped.
pub fn scan_columns(edges: &Pix, axes: &AxisLines, step: u32) -> Vec<Point> {
    let w = edges.width() as i32;
    let h = edges.height() as i32;
    let x_from = (axes.y_axis_column().round() as i32).clamp(0, w - 1);
    let x_to = axes.x.x_extent().1.clamp(0, w - 1);
    let row = (axes.x_axis_row().round() as i32).clamp(0, h - 1);
    let top = axes.y.y_extent().0.clamp(0, row);

    let mut points = Vec::new();
    for x in (x_from..=x_to).step_by(step.max(1) as usize) {
        let mut y = row;
        // axis stroke
        while y >= top && edges.is_set(x, y) {
            y -= 1;
        }
        while y >= top && !edges.is_set(x, y) {
            y -= 1;
        }
        if y < top {
            continue;
        }
        let bottom = y;
        while y > top && edges.is_set(x, y - 1) {
            y -= 1;
        }
        points.push(Point::new(x as f64, (y + bottom) as f64 * 0.5));
    }
    points
}

/// Locate the plotted curve in a binary edge map.
pub fn detect_curve(
    engine: &dyn VisionEngine,
    edges: &Pix,
    axes: &AxisLines,
    options: &CurveOptions,
) -> RegionResult<CurveDetection> {
    let detection = match options.strategy {
        CurveStrategy::Contour => {
            let contours = engine.detect_contours(edges)?;
            let selected = select_contour(&contours, edges.width(), edges.height(), options);
            CurveDetection {
                points: selected
                    .map(|i| sample_contour(&contours[i], options.sample_count))
                    .unwrap_or_default(),
                candidates: contours.len(),
                selected,
                selected_area: selected.map(|i| contours[i].area()),
            }
        }
        CurveStrategy::ColumnScan => {
            let points = scan_columns(edges, axes, options.column_step);
            let step = options.column_step.max(1) as i32;
            let (x0, x1) = (axes.y_axis_column().round() as i32, axes.x.x_extent().1);
            CurveDetection {
                points,
                candidates: ((x1 - x0).max(0) / step + 1) as usize,
                selected: None,
                selected_area: None,
            }
        }
    };

    if detection.found() {
        log::debug!(
            "curve: {:?}, {} candidates, {} samples",
            options.strategy,
            detection.candidates,
            detection.points.len()
        );
    } else {
        log::info!(
            "curve not found: {:?}, {} candidates",
            options.strategy,
            detection.candidates
        );
    }
    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdig_core::{LineSegment, PixMut, PixelDepth, PixelPoint};

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Contour {
        let mut pts = Vec::new();
        for x in x0..x1 {
            pts.push(PixelPoint::new(x, y0));
        }
        for y in y0..y1 {
            pts.push(PixelPoint::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            pts.push(PixelPoint::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            pts.push(PixelPoint::new(x0, y));
        }
        Contour::new(pts)
    }

    #[test]
    fn test_selection_gates() {
        let options = CurveOptions::default();
        let contours = vec![
            rect(0, 0, 5, 5),      // speck, area 25
            rect(0, 0, 40, 40),    // square blob, too round
            rect(0, 0, 200, 6),    // stroke, area 1200
            rect(0, 0, 390, 290),  // frame, too large
            rect(10, 10, 210, 16), // equal-area stroke, later
        ];
        assert_eq!(select_contour(&contours, 400, 300, &options), Some(2));

        let none = vec![rect(0, 0, 5, 5), rect(0, 0, 40, 40)];
        assert_eq!(select_contour(&none, 400, 300, &options), None);
    }

    #[test]
    fn test_perimeter_ratio_gate() {
        let thin = rect(0, 0, 200, 1); // ratio ~2
        let thick = rect(0, 0, 200, 10); // ratio ~0.21
        let options = CurveOptions {
            max_circularity: None,
            max_perimeter_ratio: Some(1.0),
            ..Default::default()
        };
        assert!(!options.accepts(&thin, 400, 300));
        assert!(options.accepts(&thick, 400, 300));
    }

    #[test]
    fn test_sampling_stride_and_order() {
        let c = rect(0, 0, 100, 10); // 220 border points
        let pts = sample_contour(&c, 100);
        assert_eq!(pts.len(), 110);
        assert!(pts.windows(2).all(|w| w[0].x <= w[1].x));
        assert_eq!(sample_contour(&rect(0, 0, 3, 3), 100).len(), 12);
    }

    #[test]
    fn test_column_scan_skips_axis_band() {
        let mut pm = PixMut::new(60, 50, PixelDepth::Bit1).unwrap();
        for x in 5..60 {
            for y in 39..42 {
                pm.set_pixel(x, y, 1).unwrap(); // x axis
            }
            for y in 20..23 {
                pm.set_pixel(x, y, 1).unwrap(); // curve
            }
        }
        for y in 0..42 {
            for x in 4..7 {
                pm.set_pixel(x, y, 1).unwrap(); // y axis
            }
        }
        let edges: Pix = pm.into();
        let axes = AxisLines::new(LineSegment::new(4, 40, 59, 40), LineSegment::new(5, 0, 5, 41));
        let pts = scan_columns(&edges, &axes, 5);
        // column 5 is the y axis itself
        assert_eq!(pts.len(), 10);
        assert_eq!(pts[0], Point::new(10.0, 21.0));
        assert!(pts.iter().all(|p| p.y == 21.0));
    }
}
