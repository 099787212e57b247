//! PIX - The image container
//!
//! The `Pix` structure is the image type passed between pipeline stages.
//! Three depths are used:
//!
//! - 1 bpp: binary edge maps, where 1 marks ink (foreground)
//! - 8 bpp: grayscale intensity
//! - 32 bpp: RGBA color, packed `0xRRGGBBAA`
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - Pixels are packed MSB to LSB within each word
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;

pub use access::*;

use crate::color;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 32-bit RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Internal PIX data
#[derive(Debug, Clone)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// 32-bit words per line
    wpl: u32,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

impl PixData {
    fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let wpl = compute_wpl(width, depth);
        Ok(Self {
            width,
            height,
            depth,
            wpl,
            data: vec![0u32; wpl as usize * height as usize],
        })
    }

    #[inline]
    fn row(&self, y: u32) -> &[u32] {
        let start = (y * self.wpl) as usize;
        &self.data[start..start + self.wpl as usize]
    }

    #[inline]
    fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.wpl) as usize;
        let wpl = self.wpl as usize;
        &mut self.data[start..start + wpl]
    }

    #[inline]
    fn get(&self, x: u32, y: u32) -> u32 {
        let line = self.row(y);
        match self.depth {
            PixelDepth::Bit1 => get_data_bit(line, x),
            PixelDepth::Bit8 => get_data_byte(line, x),
            PixelDepth::Bit32 => line[x as usize],
        }
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth;
        let line = self.row_mut(y);
        match depth {
            PixelDepth::Bit1 => set_data_bit(line, x, val),
            PixelDepth::Bit8 => set_data_byte(line, x, val),
            PixelDepth::Bit32 => line[x as usize] = val,
        }
    }

    #[inline]
    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn out_of_bounds(&self, x: u32, y: u32) -> Error {
        Error::PixelOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Compute words per line for given width and depth.
#[inline]
fn compute_wpl(width: u32, depth: PixelDepth) -> u32 {
    let bits_per_line = u64::from(width) * u64::from(depth.bits());
    bits_per_line.div_ceil(32) as u32
}

/// PIX - Image container
///
/// # Examples
///
/// ```
/// use chartdig_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(Pix {
            inner: Arc::new(PixData::new(width, height, depth)?),
        })
    }

    /// Create a 32 bpp PIX from a tightly packed RGBA byte buffer.
    ///
    /// This is the decoded-raster form handed over by image loaders:
    /// `width * height * 4` bytes in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty image and
    /// [`Error::BufferSize`] if the buffer length does not match.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let mut data = PixData::new(width, height, PixelDepth::Bit32)?;
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        for (i, px) in bytes.chunks_exact(4).enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            data.set(x, y, color::compose_rgba(px[0], px[1], px[2], px[3]));
        }
        Ok(Pix {
            inner: Arc::new(data),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get the packed words of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        self.inner.row(y)
    }

    /// Get a pixel value, or `None` outside the image.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner
            .contains(x, y)
            .then(|| self.inner.get(x, y))
    }

    /// Get a pixel value without bounds checking against the image width.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`; an `x` beyond the width reads padding bits or
    /// panics depending on the depth.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.get(x, y)
    }

    /// Get the RGBA channels of a 32 bpp pixel.
    ///
    /// Grayscale pixels are replicated across the color channels; binary
    /// pixels render ink as black on white.
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        let val = self.get_pixel(x, y)?;
        Some(match self.depth() {
            PixelDepth::Bit32 => color::extract_rgba(val),
            PixelDepth::Bit8 => (val as u8, val as u8, val as u8, 255),
            PixelDepth::Bit1 => {
                let v = if val != 0 { 0 } else { 255 };
                (v, v, v, 255)
            }
        })
    }

    /// Check whether a signed coordinate is inside the image and nonzero.
    ///
    /// Convenience for neighborhood walks on binary images.
    #[inline]
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && self.inner.contains(x as u32, y as u32)
            && self.inner.get(x as u32, y as u32) != 0
    }

    /// Count nonzero pixels.
    pub fn count_pixels(&self) -> u64 {
        let mut count = 0u64;
        match self.depth() {
            PixelDepth::Bit1 => {
                let full_words = (self.width() / 32) as usize;
                let rem = self.width() % 32;
                for y in 0..self.height() {
                    let line = self.row_data(y);
                    for &w in &line[..full_words] {
                        count += w.count_ones() as u64;
                    }
                    if rem > 0 {
                        let mask = !0u32 << (32 - rem);
                        count += (line[full_words] & mask).count_ones() as u64;
                    }
                }
            }
            _ => {
                for y in 0..self.height() {
                    for x in 0..self.width() {
                        if self.inner.get(x, y) != 0 {
                            count += 1;
                        }
                    }
                }
            }
        }
        count
    }

    /// Render the image as a tightly packed RGBA byte buffer.
    ///
    /// Used to hand edge maps to preview collaborators.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width() as usize * self.height() as usize * 4);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let (r, g, b, a) = self.get_rgba(x, y).unwrap_or((0, 0, 0, 0));
                out.extend_from_slice(&[r, g, b, a]);
            }
        }
        out
    }

    /// Check if two PIX have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.depth() == other.depth()
    }

    /// Try to convert into a mutable PIX without copying.
    ///
    /// Succeeds only when this is the sole reference; otherwise the
    /// original `Pix` is handed back.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Pix> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(PixMut { inner }),
            Err(inner) => Err(Pix { inner }),
        }
    }

    /// Create a mutable deep copy.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable PIX
///
/// Obtained from [`Pix::try_into_mut`], [`Pix::to_mut`] or
/// [`PixMut::new`]; converted back with `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Create a new zeroed mutable PIX.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(PixMut {
            inner: PixData::new(width, height, depth)?,
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get a pixel value, or `None` outside the image.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner
            .contains(x, y)
            .then(|| self.inner.get(x, y))
    }

    /// Set a pixel value.
    ///
    /// The value is masked to the pixel depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if !self.inner.contains(x, y) {
            return Err(self.inner.out_of_bounds(x, y));
        }
        self.inner.set(x, y, val & self.inner.depth.max_value());
        Ok(())
    }

    /// Set a pixel value without bounds checking against the image width.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        self.inner.set(x, y, val & self.inner.depth.max_value());
    }

    /// Set an RGB pixel (alpha = 255) in a 32 bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for non-32 bpp images and
    /// [`Error::PixelOutOfBounds`] outside the image.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_rgba(x, y, r, g, b, 255)
    }

    /// Set an RGBA pixel in a 32 bpp image.
    pub fn set_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        if self.inner.depth != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.inner.depth.bits()));
        }
        self.set_pixel(x, y, color::compose_rgba(r, g, b, a))
    }

    /// Set every pixel to `val`.
    pub fn fill(&mut self, val: u32) {
        let val = val & self.inner.depth.max_value();
        for y in 0..self.inner.height {
            for x in 0..self.inner.width {
                self.inner.set(x, y, val);
            }
        }
    }
}

impl From<PixMut> for Pix {
    fn from(pix: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            Pix::new(0, 10, PixelDepth::Bit8),
            Err(Error::InvalidDimension { width: 0, height: 10 })
        ));
        assert!(Pix::new(10, 0, PixelDepth::Bit1).is_err());
    }

    #[test]
    fn test_binary_pixels_across_word_boundary() {
        let mut pm = PixMut::new(70, 3, PixelDepth::Bit1).unwrap();
        for x in [0, 31, 32, 33, 63, 64, 69] {
            pm.set_pixel(x, 1, 1).unwrap();
        }
        let pix: Pix = pm.into();
        assert_eq!(pix.wpl(), 3);
        assert_eq!(pix.count_pixels(), 7);
        assert_eq!(pix.get_pixel(32, 1), Some(1));
        assert_eq!(pix.get_pixel(34, 1), Some(0));
        assert_eq!(pix.get_pixel(70, 1), None);
        assert!(pix.is_set(69, 1));
        assert!(!pix.is_set(-1, 1));
    }

    #[test]
    fn test_gray_and_rgba_access() {
        let mut pm = PixMut::new(5, 5, PixelDepth::Bit8).unwrap();
        pm.set_pixel(4, 4, 300).unwrap(); // masked to 8 bits
        assert_eq!(pm.get_pixel(4, 4), Some(300 & 0xff));
        assert!(pm.set_rgb(0, 0, 1, 2, 3).is_err());

        let mut pm = PixMut::new(2, 2, PixelDepth::Bit32).unwrap();
        pm.set_rgba(1, 0, 10, 20, 30, 40).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgba(1, 0), Some((10, 20, 30, 40)));
    }

    #[test]
    fn test_from_rgba_bytes() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        let pix = Pix::from_rgba_bytes(2, 1, &bytes).unwrap();
        assert_eq!(pix.get_rgba(0, 0), Some((1, 2, 3, 4)));
        assert_eq!(pix.get_rgba(1, 0), Some((5, 6, 7, 8)));
        assert_eq!(pix.to_rgba_bytes(), bytes.to_vec());
        assert!(matches!(
            Pix::from_rgba_bytes(2, 2, &bytes),
            Err(Error::BufferSize { expected: 16, actual: 8 })
        ));
    }

    #[test]
    fn test_try_into_mut_shared() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let other = pix.clone();
        let pix = pix.try_into_mut().unwrap_err();
        drop(other);
        assert!(pix.try_into_mut().is_ok());
    }
}
