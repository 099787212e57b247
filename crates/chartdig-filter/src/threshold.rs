//! Fixed-threshold binarization

use crate::{FilterError, FilterResult};
use chartdig_core::{Pix, PixMut, PixelDepth};

/// Convert an 8 bpp grayscale image to binary using a fixed threshold.
///
/// Pixels darker than `threshold` become ink (1); all others become
/// background (0).
pub fn threshold_to_binary(pix: &Pix, threshold: u8) -> FilterResult<Pix> {
    binarize(pix, |v| v < threshold as u32)
}

/// Mark pixels whose value is at least `threshold` as ink (1).
///
/// Used on gradient magnitude images, where bright means edge.
pub fn threshold_at_least(pix: &Pix, threshold: u8) -> FilterResult<Pix> {
    binarize(pix, |v| v >= threshold as u32)
}

fn binarize<F: Fn(u32) -> bool>(pix: &Pix, is_ink: F) -> FilterResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }

    let w = pix.width();
    let h = pix.height();
    let mut out = PixMut::new(w, h, PixelDepth::Bit1)?;
    for y in 0..h {
        for x in 0..w {
            if is_ink(pix.get_pixel_unchecked(x, y)) {
                out.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    Ok(out.into())
}
