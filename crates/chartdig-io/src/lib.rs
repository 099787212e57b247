//! chartdig-io - Image I/O for the chart digitizer
//!
//! Decoding is the first suspension point of a digitization request: the
//! pipeline only ever receives a fully decoded [`Pix`], so no stage can
//! start before the image is in memory.
//!
//! Supported formats:
//!
//! - PNG (read/write, feature `png-format`)
//! - JPEG (read, feature `jpeg`)
//! - Raw RGBA buffers via [`decode_rgba`]

mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use chartdig_core::Pix;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;

/// Read an image from a file path, detecting the format from its header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    read_with_format(reader, format)
}

/// Decode an encoded image held in memory.
pub fn decode_image(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    read_with_format(Cursor::new(data), format)
}

/// Wrap an already decoded RGBA raster.
pub fn decode_rgba(width: u32, height: u32, rgba: &[u8]) -> IoResult<Pix> {
    Ok(Pix::from_rgba_bytes(width, height, rgba)?)
}

fn read_with_format<R: std::io::BufRead + std::io::Seek>(
    reader: R,
    format: ImageFormat,
) -> IoResult<Pix> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Write an image to a file path as PNG.
#[cfg(feature = "png-format")]
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    png::write_png(pix, writer)
}

/// Encode an image as PNG into a byte vector.
#[cfg(feature = "png-format")]
pub fn encode_png(pix: &Pix) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    png::write_png(pix, &mut out)?;
    Ok(out)
}
