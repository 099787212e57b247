//! chartdig-region - Vision primitives for chart digitization
//!
//! This crate provides the detectors the digitizer builds on:
//!
//! - **Connected component analysis** - Finding and labeling connected regions
//! - **Border tracing** - One closed [`Contour`](chartdig_core::Contour) per region
//! - **Line detection** - Probabilistic Hough transform yielding
//!   [`LineSegment`](chartdig_core::LineSegment)s
//! - **Engine seam** - The [`VisionEngine`] trait and the [`EngineHandle`]
//!   readiness signal
//!
//! # Examples
//!
//! ```
//! use chartdig_region::{HoughParams, NativeEngine, VisionEngine};
//! use chartdig_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(100, 100, PixelDepth::Bit1).unwrap();
//! let mut pix_mut = pix.try_into_mut().unwrap();
//! for x in 10..90 {
//!     pix_mut.set_pixel(x, 50, 1).unwrap();
//! }
//! let pix: Pix = pix_mut.into();
//!
//! let engine = NativeEngine;
//! let lines = engine.detect_lines(&pix, &HoughParams::default()).unwrap();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(engine.detect_contours(&pix).unwrap().len(), 1);
//! ```

pub mod ccbord;
pub mod conncomp;
pub mod engine;
mod error;
pub mod hough;

pub use ccbord::{Direction, get_outer_borders, to_chain_code, trace_outer_border};
pub use conncomp::{
    ComponentBounds, ConnectedComponent, ConnectivityType, find_connected_components,
    label_connected_components,
};
pub use engine::{DEFAULT_READY_TIMEOUT, EngineHandle, EngineInit, NativeEngine, VisionEngine};
pub use error::{RegionError, RegionResult};
pub use hough::{HoughParams, hough_lines_p};
