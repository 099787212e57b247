//! Convolution kernels

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zeroed kernel with the center in the middle.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be positive: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; (width * height) as usize],
        })
    }

    /// Create a kernel from row-major values.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values, got {}",
                kernel.data.len(),
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a normalized Gaussian kernel of odd `size`.
    pub fn gaussian(size: u32, sigma: f32) -> FilterResult<Self> {
        if size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian size must be odd, got {}",
                size
            )));
        }
        if sigma <= 0.0 || !sigma.is_finite() {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian sigma must be positive, got {}",
                sigma
            )));
        }
        let mut kernel = Self::new(size, size)?;
        let half = (size / 2) as i32;
        let denom = 2.0 * sigma * sigma;
        for y in 0..size {
            for x in 0..size {
                let dx = x as i32 - half;
                let dy = y as i32 - half;
                let r2 = (dx * dx + dy * dy) as f32;
                kernel.set(x, y, (-r2 / denom).exp());
            }
        }
        kernel.normalize();
        Ok(kernel)
    }

    /// Sobel kernel responding to horizontal edges (vertical gradient).
    pub fn sobel_horizontal() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    /// Sobel kernel responding to vertical edges (horizontal gradient).
    pub fn sobel_vertical() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set a value at (x, y); out-of-range positions are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// A kernel summing to zero is left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_normalized_and_symmetric() {
        let k = Kernel::gaussian(5, 2.0).unwrap();
        assert!((k.sum() - 1.0).abs() < 1e-5);
        assert_eq!(k.center_x(), 2);
        assert_eq!(k.get(0, 0), k.get(4, 4));
        assert!(k.get(2, 2).unwrap() > k.get(1, 2).unwrap());
    }

    #[test]
    fn test_gaussian_rejects_even_size() {
        assert!(Kernel::gaussian(4, 1.0).is_err());
        assert!(Kernel::gaussian(5, 0.0).is_err());
    }

    #[test]
    fn test_from_slice_length() {
        assert!(Kernel::from_slice(2, 2, &[1.0; 3]).is_err());
        let k = Kernel::from_slice(3, 1, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(k.get(2, 0), Some(3.0));
        assert_eq!(k.get(3, 0), None);
    }

    #[test]
    fn test_sobel_kernels_sum_to_zero() {
        assert_eq!(Kernel::sobel_horizontal().sum(), 0.0);
        assert_eq!(Kernel::sobel_vertical().sum(), 0.0);
    }
}
