//! Sobel edge detection

use crate::convolve::convolve_raw;
use crate::{FilterResult, Kernel};
use chartdig_core::{Pix, PixMut, PixelDepth};

/// Edge detection orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrientation {
    /// Detect horizontal edges
    Horizontal,
    /// Detect vertical edges
    Vertical,
    /// Detect all edges (gradient magnitude)
    All,
}

/// Apply Sobel edge detection to an 8 bpp grayscale image.
///
/// The response is divided by 4 so that a full black-to-white step maps to
/// 255, then clamped to 8 bits.
pub fn sobel_edge(pix: &Pix, orientation: EdgeOrientation) -> FilterResult<Pix> {
    let gy = match orientation {
        EdgeOrientation::Vertical => None,
        _ => Some(convolve_raw(pix, &Kernel::sobel_horizontal())?),
    };
    let gx = match orientation {
        EdgeOrientation::Horizontal => None,
        _ => Some(convolve_raw(pix, &Kernel::sobel_vertical())?),
    };

    let w = pix.width();
    let mut out = PixMut::new(w, pix.height(), PixelDepth::Bit8)?;
    let n = w as usize * pix.height() as usize;
    for i in 0..n {
        let mag = match (&gx, &gy) {
            (Some(gx), Some(gy)) => gx[i].hypot(gy[i]),
            (Some(gx), None) => gx[i].abs(),
            (None, Some(gy)) => gy[i].abs(),
            (None, None) => 0.0,
        };
        let x = (i % w as usize) as u32;
        let y = (i / w as usize) as u32;
        out.set_pixel_unchecked(x, y, (mag / 4.0).round().clamp(0.0, 255.0) as u32);
    }
    Ok(out.into())
}
