//! Depth conversion to 8 bpp grayscale

use crate::FilterResult;
use chartdig_core::{Pix, PixMut, PixelDepth, color};

/// Convert an image to 8 bpp grayscale.
///
/// - 32 bpp: luma `0.299 R + 0.587 G + 0.114 B`; alpha is ignored
/// - 8 bpp: returned as a cheap clone
/// - 1 bpp: ink becomes 0, background 255
pub fn to_gray(pix: &Pix) -> FilterResult<Pix> {
    if pix.depth() == PixelDepth::Bit8 {
        return Ok(pix.clone());
    }

    let w = pix.width();
    let h = pix.height();
    let mut out = PixMut::new(w, h, PixelDepth::Bit8)?;

    match pix.depth() {
        PixelDepth::Bit32 => {
            for y in 0..h {
                for x in 0..w {
                    let (r, g, b, _) = color::extract_rgba(pix.get_pixel_unchecked(x, y));
                    out.set_pixel_unchecked(x, y, color::luma(r, g, b) as u32);
                }
            }
        }
        _ => {
            for y in 0..h {
                for x in 0..w {
                    let val = if pix.get_pixel_unchecked(x, y) != 0 { 0 } else { 255 };
                    out.set_pixel_unchecked(x, y, val);
                }
            }
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_gray_luma() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit32).unwrap();
        pm.set_rgb(0, 0, 255, 255, 255).unwrap();
        pm.set_rgb(1, 0, 0, 0, 0).unwrap();
        pm.set_rgb(2, 0, 100, 150, 200).unwrap();
        let gray = to_gray(&pm.into()).unwrap();
        assert_eq!(gray.depth(), PixelDepth::Bit8);
        assert_eq!(gray.get_pixel(0, 0), Some(255));
        assert_eq!(gray.get_pixel(1, 0), Some(0));
        // 29.9 + 88.05 + 22.8 = 140.75
        assert_eq!(gray.get_pixel(2, 0), Some(141));
    }

    #[test]
    fn test_binary_to_gray() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(0, 0, 1).unwrap();
        let gray = to_gray(&pm.into()).unwrap();
        assert_eq!(gray.get_pixel(0, 0), Some(0));
        assert_eq!(gray.get_pixel(1, 0), Some(255));
    }
}
