//! Geometric primitives shared by the pipeline stages
//!
//! - [`Point`] - floating-point point (pixel space or value space)
//! - [`PixelPoint`] - integer pixel coordinate
//! - [`LineSegment`] - detected line segment with derived angle and length
//! - [`Contour`] - traced border with area, perimeter and circularity

mod contour;
mod point;
mod segment;

pub use contour::Contour;
pub use point::{PixelPoint, Point};
pub use segment::LineSegment;
