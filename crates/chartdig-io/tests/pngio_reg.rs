//! PNG I/O regression test
//!
//! Lossless write/read of the three depths handled by the pipeline, plus
//! format detection on encoded bytes.
//!
//! Run with:
//! ```
//! cargo test -p chartdig-io --test pngio_reg
//! ```

use chartdig_core::{Pix, PixMut, PixelDepth};
use chartdig_io::{ImageFormat, decode_image, detect_format_from_bytes, encode_png, read_image, write_image};
use chartdig_test::{ChartImage, RegParams, regout_dir};
use std::fs;

#[test]
fn pngio_reg() {
    let mut rp = RegParams::new("pngio");
    fs::create_dir_all(regout_dir()).expect("Failed to create output directory");

    // 32 bpp synthetic chart survives a file round trip
    let chart = ChartImage::new(120, 80)
        .frame(4, 2)
        .line(10, 70, 110, 70, 3)
        .ink(200, 30, 30)
        .polyline(&[(15.0, 20.0), (60.0, 35.0), (105.0, 60.0)], 2)
        .build();
    let path = format!("{}/pngio_chart.png", regout_dir());
    write_image(&chart, &path).expect("write chart");
    let back = read_image(&path).expect("read chart");
    rp.compare_pix(&chart, &back);

    // 8 bpp gray round trip in memory
    let mut pm = PixMut::new(33, 7, PixelDepth::Bit8).unwrap();
    for y in 0..7 {
        for x in 0..33 {
            pm.set_pixel(x, y, (x * 7 + y * 11) % 256).unwrap();
        }
    }
    let gray: Pix = pm.into();
    let bytes = encode_png(&gray).expect("encode gray");
    rp.compare_bool(true, detect_format_from_bytes(&bytes).ok() == Some(ImageFormat::Png));
    let gray_back = decode_image(&bytes).expect("decode gray");
    rp.compare_pix(&gray, &gray_back);

    // 1 bpp edge maps are written as ink-on-white gray
    let mut pm = PixMut::new(40, 3, PixelDepth::Bit1).unwrap();
    for x in (0..40).step_by(3) {
        pm.set_pixel(x, 1, 1).unwrap();
    }
    let edges: Pix = pm.into();
    let edges_back = decode_image(&encode_png(&edges).unwrap()).unwrap();
    rp.compare_values(8.0, edges_back.depth().bits() as f64, 0.0);
    rp.compare_values(0.0, edges_back.get_pixel(3, 1).unwrap() as f64, 0.0);
    rp.compare_values(255.0, edges_back.get_pixel(4, 1).unwrap() as f64, 0.0);
    rp.compare_values(255.0, edges_back.get_pixel(3, 0).unwrap() as f64, 0.0);

    // Garbage is not an image
    rp.compare_bool(true, decode_image(b"not an image").is_err());

    assert!(rp.cleanup(), "pngio regression test failed");
}
