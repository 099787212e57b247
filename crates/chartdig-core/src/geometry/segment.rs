use super::Point;
use serde::{Deserialize, Serialize};

/// A line segment between two integer pixel endpoints.
///
/// Produced by line detection; angle and length are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Direction angle in degrees, normalized to `[0, 180)`.
    ///
    /// 0 is horizontal and 90 vertical; the endpoint order does not matter.
    pub fn angle_deg(&self) -> f64 {
        let dy = (self.y2 - self.y1) as f64;
        let dx = (self.x2 - self.x1) as f64;
        let a = dy.atan2(dx).to_degrees().rem_euclid(180.0);
        // rem_euclid can round up to exactly 180.0 for tiny negative inputs
        if a >= 180.0 { 0.0 } else { a }
    }

    /// Euclidean length in pixels.
    pub fn length(&self) -> f64 {
        ((self.x2 - self.x1) as f64).hypot((self.y2 - self.y1) as f64)
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.x1 + self.x2) as f64 * 0.5,
            (self.y1 + self.y2) as f64 * 0.5,
        )
    }

    /// Within `tol_deg` of horizontal.
    pub fn is_near_horizontal(&self, tol_deg: f64) -> bool {
        let a = self.angle_deg();
        a <= tol_deg || a >= 180.0 - tol_deg
    }

    /// Within `tol_deg` of vertical.
    pub fn is_near_vertical(&self, tol_deg: f64) -> bool {
        (self.angle_deg() - 90.0).abs() <= tol_deg
    }

    /// `(min_x, max_x)` of the endpoints.
    pub fn x_extent(&self) -> (i32, i32) {
        (self.x1.min(self.x2), self.x1.max(self.x2))
    }

    /// `(min_y, max_y)` of the endpoints.
    pub fn y_extent(&self) -> (i32, i32) {
        (self.y1.min(self.y2), self.y1.max(self.y2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_is_order_independent() {
        let a = LineSegment::new(0, 0, 10, 0);
        let b = LineSegment::new(10, 0, 0, 0);
        assert_eq!(a.angle_deg(), 0.0);
        assert_eq!(b.angle_deg(), 0.0);
        let v = LineSegment::new(5, 0, 5, 10);
        let w = LineSegment::new(5, 10, 5, 0);
        assert!((v.angle_deg() - 90.0).abs() < 1e-9);
        assert!((w.angle_deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_near_horizontal_wraps() {
        // Slightly rising segment drawn right-to-left: angle just under 180
        let s = LineSegment::new(100, 0, 0, 3);
        assert!(s.angle_deg() > 170.0);
        assert!(s.is_near_horizontal(5.0));
        assert!(!s.is_near_vertical(5.0));
    }

    #[test]
    fn test_length_and_extent() {
        let s = LineSegment::new(3, 8, 0, 4);
        assert_eq!(s.length(), 5.0);
        assert_eq!(s.x_extent(), (0, 3));
        assert_eq!(s.y_extent(), (4, 8));
        assert_eq!(s.midpoint(), Point::new(1.5, 6.0));
    }
}
