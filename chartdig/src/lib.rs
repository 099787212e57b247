//! chartdig - Chart digitizer
//!
//! Turns a raster image of a performance-curve chart into calibrated
//! `(x, y)` data:
//!
//! - [`io`] decodes PNG/JPEG files and raw RGBA buffers
//! - [`filter`] grays, blurs, binarizes and finds edges
//! - [`region`] traces contours and detects line segments
//! - [`digitize`] calibrates the axes, extracts and refines the curve
//!
//! # Examples
//!
//! ```
//! use chartdig::digitize::{Axis, DigitizeRequest, Digitizer};
//! use chartdig::{Pix, PixelDepth, color};
//!
//! let mut canvas = Pix::new(160, 120, PixelDepth::Bit32).unwrap().to_mut();
//! canvas.fill(color::compose_rgb(255, 255, 255));
//! let image: Pix = canvas.into();
//!
//! let request = DigitizeRequest::new(
//!     Axis::new(0.0, 1000.0, "CFM", "Flow"),
//!     Axis::new(0.0, 4.0, "inH2O", "Static pressure"),
//! );
//! let result = Digitizer::default().digitize(&image, &request).unwrap();
//! assert_eq!(result.edges.width(), 160);
//! ```

pub use chartdig_core::*;
pub use chartdig_digitize as digitize;
pub use chartdig_filter as filter;
pub use chartdig_io as io;
pub use chartdig_region as region;
