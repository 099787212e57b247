//! chartdig-filter - Chart image preprocessing
//!
//! This crate turns raw chart rasters into binary edge maps:
//!
//! - Depth conversion to grayscale (luma)
//! - Convolution and Gaussian blur
//! - Fixed-threshold binarization
//! - Sobel edge detection
//! - [`preprocess`], which chains the above

pub mod convert;
pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod preprocess;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use convert::to_gray;
pub use convolve::{convolve_gray, gaussian_blur, gaussian_blur_auto};
pub use edge::{EdgeOrientation, sobel_edge};
pub use preprocess::{PreprocessMode, PreprocessOptions, preprocess, preprocess_rgba};
pub use threshold::{threshold_at_least, threshold_to_binary};
