//! chartdig Core - Basic data structures for chart digitization
//!
//! This crate provides the fundamental data structures shared by every
//! stage of the chartdig pipeline:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`Point`] - A 2D point in pixel space or value space
//! - [`LineSegment`] - An integer line segment from line detection
//! - [`Contour`] - An ordered border of a connected edge region
//!
//! Pixel space and value space share the [`Point`] type. Conversion between
//! the two happens in exactly one place, the coordinate transformer of
//! `chartdig-digitize`.

pub mod error;
pub mod geometry;
pub mod pix;

pub use error::{Error, Result};
pub use geometry::{Contour, LineSegment, PixelPoint, Point};
pub use pix::{Pix, PixMut, PixelDepth};

/// Color channel helpers for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 255)
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGBA values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Luma of an RGB triple, rounded to the nearest integer.
    ///
    /// Uses the BT.601 weights `0.299 R + 0.587 G + 0.114 B`.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        (y + 0.5).min(255.0) as u8
    }

}
