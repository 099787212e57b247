use super::{PixelPoint, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// An ordered border of a connected edge region.
///
/// The points run around the region in tracing order; the border is
/// treated as closed (the last point connects back to the first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    points: Vec<PixelPoint>,
}

impl Contour {
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    /// Enclosed polygon area (shoelace formula over pixel centres).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0i64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }
        (twice as f64).abs() * 0.5
    }

    /// Length of the closed polyline through the border points.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                ((q.x - p.x) as f64).hypot((q.y - p.y) as f64)
            })
            .sum()
    }

    /// Roundness score `4π·area/perimeter²`.
    ///
    /// 1 for a circle, π/4 for a square, near 0 for a thin stroke.
    pub fn circularity(&self) -> f64 {
        let p = self.perimeter();
        if p <= 0.0 {
            return 0.0;
        }
        4.0 * PI * self.area() / (p * p)
    }

    /// `perimeter / area`, infinite for a zero-area border.
    pub fn perimeter_area_ratio(&self) -> f64 {
        let a = self.area();
        if a <= 0.0 {
            f64::INFINITY
        } else {
            self.perimeter() / a
        }
    }

    /// Bounding box as `(min_x, min_y, max_x, max_y)`, `None` if empty.
    pub fn bounding_box(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        ))
    }

    /// Convert to floating-point pixel-space points, keeping order.
    pub fn to_points(&self) -> Vec<Point> {
        self.points.iter().map(|&p| p.into()).collect()
    }
}

impl From<Vec<PixelPoint>> for Contour {
    fn from(points: Vec<PixelPoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i32) -> Contour {
        let mut pts = Vec::new();
        for x in 0..side {
            pts.push(PixelPoint::new(x, 0));
        }
        for y in 0..side {
            pts.push(PixelPoint::new(side, y));
        }
        for x in (1..=side).rev() {
            pts.push(PixelPoint::new(x, side));
        }
        for y in (1..=side).rev() {
            pts.push(PixelPoint::new(0, y));
        }
        Contour::new(pts)
    }

    #[test]
    fn test_square_measures() {
        let c = square(10);
        assert_eq!(c.area(), 100.0);
        assert!((c.perimeter() - 40.0).abs() < 1e-9);
        assert!((c.circularity() - PI / 4.0).abs() < 1e-9);
        assert_eq!(c.bounding_box(), Some((0, 0, 10, 10)));
    }

    #[test]
    fn test_degenerate_contours() {
        let empty = Contour::default();
        assert_eq!(empty.area(), 0.0);
        assert_eq!(empty.circularity(), 0.0);
        assert_eq!(empty.bounding_box(), None);

        // A stroke traced out and back encloses nothing
        let stroke = Contour::new(vec![
            PixelPoint::new(0, 0),
            PixelPoint::new(1, 0),
            PixelPoint::new(2, 0),
            PixelPoint::new(1, 0),
        ]);
        assert_eq!(stroke.area(), 0.0);
        assert!(stroke.perimeter_area_ratio().is_infinite());
    }
}
