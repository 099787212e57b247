//! Convolution operations
//!
//! Implements 8 bpp grayscale convolution with arbitrary kernels.

use crate::{FilterError, FilterResult, Kernel};
use chartdig_core::{Pix, PixMut, PixelDepth};

/// Convolve and keep the unclamped sums, one per pixel in raster order.
///
/// Uses replicate (clamp) border handling: pixels outside the image
/// boundary take the value of the nearest edge pixel.
pub(crate) fn convolve_raw(pix: &Pix, kernel: &Kernel) -> FilterResult<Vec<f32>> {
    check_grayscale(pix)?;

    let w = pix.width();
    let h = pix.height();
    let kcx = kernel.center_x() as i32;
    let kcy = kernel.center_y() as i32;
    let mut out = Vec::with_capacity(w as usize * h as usize);

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in 0..kernel.height() {
                let sy = (y as i32 + ky as i32 - kcy).clamp(0, h as i32 - 1) as u32;
                for kx in 0..kernel.width() {
                    let sx = (x as i32 + kx as i32 - kcx).clamp(0, w as i32 - 1) as u32;
                    let k = kernel.get(kx, ky).unwrap_or(0.0);
                    sum += pix.get_pixel_unchecked(sx, sy) as f32 * k;
                }
            }
            out.push(sum);
        }
    }

    Ok(out)
}

/// Convolve an 8-bit grayscale image with a kernel
///
/// Results are rounded and clamped to `0..=255`.
pub fn convolve_gray(pix: &Pix, kernel: &Kernel) -> FilterResult<Pix> {
    let sums = convolve_raw(pix, kernel)?;
    let w = pix.width();
    let mut out = PixMut::new(w, pix.height(), PixelDepth::Bit8)?;
    for (i, sum) in sums.into_iter().enumerate() {
        let x = (i % w as usize) as u32;
        let y = (i / w as usize) as u32;
        out.set_pixel_unchecked(x, y, sum.round().clamp(0.0, 255.0) as u32);
    }
    Ok(out.into())
}

/// Apply Gaussian blur over a `(2 * radius + 1)` square window
pub fn gaussian_blur(pix: &Pix, radius: u32, sigma: f32) -> FilterResult<Pix> {
    let size = 2 * radius + 1;
    let kernel = Kernel::gaussian(size, sigma)?;
    convolve_gray(pix, &kernel)
}

/// Apply Gaussian blur with automatic sigma calculation
///
/// A radius of 0 returns the input unchanged.
pub fn gaussian_blur_auto(pix: &Pix, radius: u32) -> FilterResult<Pix> {
    if radius == 0 {
        check_grayscale(pix)?;
        return Ok(pix.clone());
    }
    // Use sigma = radius for a reasonable default
    gaussian_blur(pix, radius, radius as f32)
}

fn check_grayscale(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(w: u32, h: u32, val: u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit8).unwrap();
        pm.fill(val);
        pm.into()
    }

    #[test]
    fn test_blur_preserves_flat_image() {
        let pix = flat(9, 7, 200);
        let blurred = gaussian_blur_auto(&pix, 2).unwrap();
        for y in 0..7 {
            for x in 0..9 {
                assert_eq!(blurred.get_pixel(x, y), Some(200));
            }
        }
    }

    #[test]
    fn test_blur_spreads_single_dark_pixel() {
        let mut pm = flat(9, 9, 255).to_mut();
        pm.set_pixel(4, 4, 0).unwrap();
        let blurred = gaussian_blur_auto(&pm.into(), 2).unwrap();
        let center = blurred.get_pixel(4, 4).unwrap();
        let near = blurred.get_pixel(5, 4).unwrap();
        let far = blurred.get_pixel(8, 4).unwrap();
        assert!(center < near);
        assert!(near < 255);
        assert_eq!(far, 255);
    }

    #[test]
    fn test_convolve_requires_gray() {
        let pix = Pix::new(4, 4, PixelDepth::Bit32).unwrap();
        let k = Kernel::gaussian(3, 1.0).unwrap();
        assert!(matches!(
            convolve_gray(&pix, &k),
            Err(FilterError::UnsupportedDepth { actual: 32, .. })
        ));
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let pix = flat(3, 3, 17);
        let out = gaussian_blur_auto(&pix, 0).unwrap();
        assert_eq!(out.get_pixel(1, 1), Some(17));
    }
}
