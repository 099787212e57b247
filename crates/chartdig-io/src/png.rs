//! PNG image format support

use crate::{IoError, IoResult};
use chartdig_core::{Pix, PixMut, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Palettes and low bit depths are expanded and 16-bit samples stripped,
/// so the result is an 8 bpp (grayscale) or 32 bpp (RGBA) `Pix`.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            bit_depth
        )));
    }

    let depth = match color_type {
        ColorType::Grayscale => PixelDepth::Bit8,
        _ => PixelDepth::Bit32,
    };
    let mut pix = PixMut::new(width, height, depth)?;

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..];
        for x in 0..width {
            let i = x as usize;
            let val = match color_type {
                ColorType::Grayscale => row[i] as u32,
                ColorType::GrayscaleAlpha => {
                    let (g, a) = (row[i * 2], row[i * 2 + 1]);
                    color::compose_rgba(g, g, g, a)
                }
                ColorType::Rgb => color::compose_rgb(row[i * 3], row[i * 3 + 1], row[i * 3 + 2]),
                ColorType::Rgba => color::compose_rgba(
                    row[i * 4],
                    row[i * 4 + 1],
                    row[i * 4 + 2],
                    row[i * 4 + 3],
                ),
                ColorType::Indexed => {
                    return Err(IoError::UnsupportedFormat(
                        "indexed PNG was not expanded".to_string(),
                    ));
                }
            };
            pix.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix.into())
}

/// Write a PNG image
///
/// Binary images are written as 8-bit grayscale with ink black on white,
/// gray images as 8-bit grayscale and color images as RGBA.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, samples) = match pix.depth() {
        PixelDepth::Bit1 | PixelDepth::Bit8 => (ColorType::Grayscale, 1usize),
        PixelDepth::Bit32 => (ColorType::Rgba, 4usize),
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let bytes_per_row = width as usize * samples;
    let mut data = vec![0u8; bytes_per_row * height as usize];

    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            let idx = row_start + x as usize * samples;
            match pix.depth() {
                PixelDepth::Bit1 => data[idx] = if val != 0 { 0 } else { 255 },
                PixelDepth::Bit8 => data[idx] = val as u8,
                PixelDepth::Bit32 => {
                    let (r, g, b, a) = color::extract_rgba(val);
                    data[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_grayscale() {
        let mut pm = PixMut::new(10, 10, PixelDepth::Bit8).unwrap();
        for y in 0..10 {
            for x in 0..10 {
                pm.set_pixel(x, y, (x + y) * 10).unwrap();
            }
        }
        let pix: Pix = pm.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let pix2 = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(pix2.depth(), PixelDepth::Bit8);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(pix2.get_pixel(x, y), pix.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_png_binary_written_as_ink_on_white() {
        let mut pm = PixMut::new(4, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(1, 0, 1).unwrap();
        let pix: Pix = pm.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let gray = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(gray.get_pixel(0, 0), Some(255));
        assert_eq!(gray.get_pixel(1, 0), Some(0));
    }

    #[test]
    fn test_png_roundtrip_rgba() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit32).unwrap();
        pm.set_rgb(0, 0, 255, 0, 0).unwrap();
        pm.set_rgba(2, 0, 0, 0, 255, 128).unwrap();
        let pix: Pix = pm.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let pix2 = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(pix2.get_rgba(0, 0), Some((255, 0, 0, 255)));
        assert_eq!(pix2.get_rgba(2, 0), Some((0, 0, 255, 128)));
    }
}
