//! Synthetic chart images
//!
//! [`ChartImage`] draws black strokes on a white 32 bpp canvas: axes, a
//! frame, polylines, plotted functions, filled discs and speckle noise.
//! Regression tests build their inputs here instead of shipping binary
//! fixtures.

use chartdig_core::{Pix, PixMut, PixelDepth, color};
use rand::prelude::*;

/// Pixel placement of a plot area and the value ranges it spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    /// Pixel column of the y axis
    pub origin_x: i32,
    /// Pixel row of the x axis
    pub origin_y: i32,
    /// Last pixel column of the x axis
    pub x_end: i32,
    /// First pixel row of the y axis
    pub y_top: i32,
    /// Value range along x
    pub x_range: (f64, f64),
    /// Value range along y
    pub y_range: (f64, f64),
}

impl PlotArea {
    /// Map a value-space point to (fractional) pixel coordinates.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let px = self.origin_x as f64 + (x - x0) / (x1 - x0) * (self.x_end - self.origin_x) as f64;
        let py = self.origin_y as f64 - (y - y0) / (y1 - y0) * (self.origin_y - self.y_top) as f64;
        (px, py)
    }
}

/// Builder for synthetic chart images.
pub struct ChartImage {
    pix: PixMut,
    ink: u32,
}

impl ChartImage {
    /// Create a white canvas.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pix =
            PixMut::new(width, height, PixelDepth::Bit32).expect("canvas dimensions must be non-zero");
        pix.fill(color::compose_rgb(255, 255, 255));
        Self {
            pix,
            ink: color::compose_rgb(0, 0, 0),
        }
    }

    /// Set the stroke color for subsequent drawing.
    pub fn ink(mut self, r: u8, g: u8, b: u8) -> Self {
        self.ink = color::compose_rgb(r, g, b);
        self
    }

    fn plot(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            // out-of-range pixels are clipped
            let _ = self.pix.set_pixel(x as u32, y as u32, self.ink);
        }
    }

    /// Square brush of side `thickness` centred at `(x, y)`.
    fn stamp(&mut self, x: i32, y: i32, thickness: u32) {
        let t = thickness.max(1) as i32;
        let lo = -(t - 1) / 2;
        for dy in lo..lo + t {
            for dx in lo..lo + t {
                self.plot(x + dx, y + dy);
            }
        }
    }

    fn stroke(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, thickness: u32) {
        let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = x1 + (x2 - x1) * t;
            let y = y1 + (y2 - y1) * t;
            self.stamp(x.round() as i32, y.round() as i32, thickness);
        }
    }

    /// Draw a straight line.
    pub fn line(mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: u32) -> Self {
        self.stroke(x1 as f64, y1 as f64, x2 as f64, y2 as f64, thickness);
        self
    }

    /// Draw L-shaped axes meeting at the plot origin.
    pub fn axes(self, area: &PlotArea, thickness: u32) -> Self {
        self.line(area.origin_x, area.origin_y, area.x_end, area.origin_y, thickness)
            .line(area.origin_x, area.origin_y, area.origin_x, area.y_top, thickness)
    }

    /// Draw a rectangle `margin` pixels inside the canvas edge.
    pub fn frame(self, margin: i32, thickness: u32) -> Self {
        let w = self.pix.width() as i32 - 1 - margin;
        let h = self.pix.height() as i32 - 1 - margin;
        self.line(margin, margin, w, margin, thickness)
            .line(w, margin, w, h, thickness)
            .line(w, h, margin, h, thickness)
            .line(margin, h, margin, margin, thickness)
    }

    /// Draw an open polyline through pixel coordinates.
    pub fn polyline(mut self, points: &[(f64, f64)], thickness: u32) -> Self {
        for pair in points.windows(2) {
            self.stroke(pair[0].0, pair[0].1, pair[1].0, pair[1].1, thickness);
        }
        self
    }

    /// Plot `f` over the area's x range as a polyline of `steps` segments.
    pub fn function<F: Fn(f64) -> f64>(
        self,
        area: &PlotArea,
        x_from: f64,
        x_to: f64,
        f: F,
        steps: usize,
        thickness: u32,
    ) -> Self {
        let steps = steps.max(1);
        let points: Vec<(f64, f64)> = (0..=steps)
            .map(|i| {
                let x = x_from + (x_to - x_from) * i as f64 / steps as f64;
                area.to_pixel(x, f(x))
            })
            .collect();
        self.polyline(&points, thickness)
    }

    /// Fill a disc of radius `r`.
    pub fn disc(mut self, cx: i32, cy: i32, r: i32) -> Self {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.plot(cx + dx, cy + dy);
                }
            }
        }
        self
    }

    /// Scatter `count` square specks of side `size` at seeded random
    /// positions.
    pub fn noise(mut self, count: usize, size: u32, seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let w = self.pix.width() as i32;
        let h = self.pix.height() as i32;
        for _ in 0..count {
            let x = rng.random_range(0..w);
            let y = rng.random_range(0..h);
            self.stamp(x, y, size);
        }
        self
    }

    /// Finish drawing.
    pub fn build(self) -> Pix {
        self.pix.into()
    }
}
