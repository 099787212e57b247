//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale decodes to
//! 8 bpp, RGB and CMYK to 32 bpp RGBA. Writing is not supported.

use crate::{IoError, IoResult};
use chartdig_core::{Pix, PixMut, PixelDepth, color};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let npix = width as usize * height as usize;

    let (depth, samples) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, 1usize),
        PixelFormat::L16 => (PixelDepth::Bit8, 2),
        PixelFormat::RGB24 => (PixelDepth::Bit32, 3),
        PixelFormat::CMYK32 => (PixelDepth::Bit32, 4),
    };
    if pixels.len() < npix * samples {
        return Err(IoError::InvalidData(format!(
            "JPEG buffer too small: {} < {}",
            pixels.len(),
            npix * samples
        )));
    }

    let mut pix = PixMut::new(width, height, depth)?;
    for (i, px) in pixels.chunks_exact(samples).take(npix).enumerate() {
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        let val = match info.pixel_format {
            PixelFormat::L8 => px[0] as u32,
            // big-endian 16-bit sample, keep the high byte
            PixelFormat::L16 => px[0] as u32,
            PixelFormat::RGB24 => color::compose_rgb(px[0], px[1], px[2]),
            PixelFormat::CMYK32 => {
                let k = 255 - px[3] as u32;
                let ch = |c: u8| ((255 - c as u32) * k / 255) as u8;
                color::compose_rgb(ch(px[0]), ch(px[1]), ch(px[2]))
            }
        };
        pix.set_pixel_unchecked(x, y, val);
    }
    Ok(pix.into())
}
