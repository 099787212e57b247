//! Chart preprocessing
//!
//! Turns a raw chart raster into a binary edge map where 1 marks ink:
//! grayscale, Gaussian blur, then either a fixed intensity threshold or a
//! Sobel gradient threshold.

use crate::{FilterError, FilterResult, convert, convolve, edge, threshold};
use chartdig_core::Pix;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Largest accepted blur radius.
pub const MAX_BLUR_RADIUS: u32 = 32;

/// How the blurred grayscale image is binarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreprocessMode {
    /// Ink where `gray < threshold`
    #[default]
    Threshold,
    /// Ink where the Sobel gradient magnitude is at least `gradient_threshold`
    Gradient,
}

/// Preprocessor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Intensity threshold for [`PreprocessMode::Threshold`]
    pub threshold: u8,
    /// Gaussian blur radius; the window is `2 * radius + 1` wide
    pub blur_radius: u32,
    pub mode: PreprocessMode,
    /// Magnitude threshold for [`PreprocessMode::Gradient`]
    pub gradient_threshold: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            threshold: 128,
            blur_radius: 2,
            mode: PreprocessMode::Threshold,
            gradient_threshold: 64,
        }
    }
}

impl PreprocessOptions {
    /// Check the options before any work is done.
    pub fn validate(&self) -> FilterResult<()> {
        if self.blur_radius > MAX_BLUR_RADIUS {
            return Err(FilterError::InvalidParameters(format!(
                "blur_radius {} exceeds {}",
                self.blur_radius, MAX_BLUR_RADIUS
            )));
        }
        Ok(())
    }
}

/// Produce the binary edge map for a chart image.
///
/// The output has the input's dimensions and depth 1.
pub fn preprocess(pix: &Pix, options: &PreprocessOptions) -> FilterResult<Pix> {
    options.validate()?;
    let start = Instant::now();

    let gray = convert::to_gray(pix)?;
    let blurred = convolve::gaussian_blur_auto(&gray, options.blur_radius)?;
    let binary = match options.mode {
        PreprocessMode::Threshold => threshold::threshold_to_binary(&blurred, options.threshold)?,
        PreprocessMode::Gradient => {
            let magnitude = edge::sobel_edge(&blurred, edge::EdgeOrientation::All)?;
            threshold::threshold_at_least(&magnitude, options.gradient_threshold)?
        }
    };

    log::debug!(
        "preprocess: {}x{} {:?} -> {} ink pixels in {:.1?}",
        pix.width(),
        pix.height(),
        options.mode,
        binary.count_pixels(),
        start.elapsed()
    );
    Ok(binary)
}

/// Preprocess a tightly packed RGBA raster.
///
/// Empty or mismatched buffers are reported as
/// [`FilterError::InvalidImage`].
pub fn preprocess_rgba(
    width: u32,
    height: u32,
    rgba: &[u8],
    options: &PreprocessOptions,
) -> FilterResult<Pix> {
    let pix = Pix::from_rgba_bytes(width, height, rgba)
        .map_err(|e| FilterError::InvalidImage(e.to_string()))?;
    preprocess(&pix, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdig_core::{PixMut, PixelDepth};

    fn bar_chart() -> Pix {
        // white canvas with a 4-pixel-wide black vertical bar at x = 8..12
        let mut pm = PixMut::new(20, 10, PixelDepth::Bit32).unwrap();
        for y in 0..10 {
            for x in 0..20 {
                let v = if (8..12).contains(&x) { 0 } else { 255 };
                pm.set_rgb(x, y, v, v, v).unwrap();
            }
        }
        pm.into()
    }

    #[test]
    fn test_threshold_mode_marks_bar() {
        let edges = preprocess(&bar_chart(), &PreprocessOptions::default()).unwrap();
        assert_eq!(edges.depth(), PixelDepth::Bit1);
        assert_eq!((edges.width(), edges.height()), (20, 10));
        assert_eq!(edges.get_pixel(9, 5), Some(1));
        assert_eq!(edges.get_pixel(2, 5), Some(0));
        assert_eq!(edges.get_pixel(17, 5), Some(0));
    }

    #[test]
    fn test_gradient_mode_marks_bar_sides() {
        let options = PreprocessOptions {
            mode: PreprocessMode::Gradient,
            blur_radius: 0,
            ..Default::default()
        };
        let edges = preprocess(&bar_chart(), &options).unwrap();
        assert_eq!(edges.get_pixel(7, 5), Some(1));
        assert_eq!(edges.get_pixel(12, 5), Some(1));
        // flat interior and background
        assert_eq!(edges.get_pixel(9, 5), Some(0));
        assert_eq!(edges.get_pixel(2, 5), Some(0));
    }

    #[test]
    fn test_rgba_buffer_errors_are_invalid_image() {
        let options = PreprocessOptions::default();
        assert!(matches!(
            preprocess_rgba(0, 0, &[], &options),
            Err(FilterError::InvalidImage(_))
        ));
        assert!(matches!(
            preprocess_rgba(2, 2, &[0; 8], &options),
            Err(FilterError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_excessive_blur_rejected() {
        let options = PreprocessOptions {
            blur_radius: MAX_BLUR_RADIUS + 1,
            ..Default::default()
        };
        assert!(matches!(
            preprocess(&bar_chart(), &options),
            Err(FilterError::InvalidParameters(_))
        ));
    }
}
