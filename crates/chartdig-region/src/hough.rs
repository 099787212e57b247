//! Probabilistic Hough line segment detection
//!
//! Progressive probabilistic Hough transform on a binary image. Ink
//! pixels vote in random order; as soon as one accumulator cell reaches
//! the threshold, the corresponding line is walked through the image in
//! both directions, tolerating gaps of up to `max_line_gap` pixels. The
//! walked pixels are removed from further voting, and the segment is kept
//! when it is long enough.
//!
//! The visiting order comes from a seeded generator, so a given image and
//! parameter set always produce the same segments.

use crate::error::{RegionError, RegionResult, check_binary};
use chartdig_core::{LineSegment, Pix};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters for [`hough_lines_p`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Distance resolution of the accumulator in pixels
    pub rho: f64,
    /// Angle resolution of the accumulator in degrees
    pub theta_deg: f64,
    /// Minimum accumulator votes for a line
    pub threshold: u32,
    /// Minimum segment extent along x or y, in pixels
    pub min_line_length: u32,
    /// Largest run of missing pixels bridged within one segment
    pub max_line_gap: u32,
    /// Seed for the pixel visiting order
    pub seed: u64,
    /// Stop after this many segments (0 = no limit)
    pub max_lines: usize,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_deg: 1.0,
            threshold: 50,
            min_line_length: 50,
            max_line_gap: 10,
            seed: 0,
            max_lines: 0,
        }
    }
}

impl HoughParams {
    fn validate(&self) -> RegionResult<()> {
        if !(self.rho > 0.0 && self.rho.is_finite()) {
            return Err(RegionError::InvalidParameters(format!(
                "rho must be positive, got {}",
                self.rho
            )));
        }
        if !(self.theta_deg > 0.0 && self.theta_deg <= 180.0) {
            return Err(RegionError::InvalidParameters(format!(
                "theta_deg must be in (0, 180], got {}",
                self.theta_deg
            )));
        }
        if self.threshold == 0 {
            return Err(RegionError::InvalidParameters(
                "threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

struct Accumulator {
    numrho: usize,
    trig: Vec<(f64, f64)>,
    votes: Vec<i32>,
}

impl Accumulator {
    fn new(width: u32, height: u32, params: &HoughParams) -> Self {
        let theta = params.theta_deg.to_radians();
        let numangle = ((PI / theta).round() as usize).max(1);
        let numrho = ((((width + height) * 2 + 1) as f64 / params.rho).round() as usize).max(1);
        let trig = (0..numangle)
            .map(|n| {
                let a = n as f64 * theta;
                (a.cos() / params.rho, a.sin() / params.rho)
            })
            .collect();
        Self {
            numrho,
            trig,
            votes: vec![0; numangle * numrho],
        }
    }

    #[inline]
    fn cell(&self, n: usize, x: i32, y: i32) -> usize {
        let (c, s) = self.trig[n];
        let r = (x as f64 * c + y as f64 * s).round() as i64 + (self.numrho as i64 - 1) / 2;
        n * self.numrho + r.clamp(0, self.numrho as i64 - 1) as usize
    }

    /// Add one vote per angle; returns the best `(votes, angle index)`.
    fn vote(&mut self, x: i32, y: i32) -> (i32, usize) {
        let mut best = (0, 0);
        for n in 0..self.trig.len() {
            let idx = self.cell(n, x, y);
            self.votes[idx] += 1;
            if self.votes[idx] > best.0 {
                best = (self.votes[idx], n);
            }
        }
        best
    }

    fn unvote(&mut self, x: i32, y: i32) {
        for n in 0..self.trig.len() {
            let idx = self.cell(n, x, y);
            self.votes[idx] -= 1;
        }
    }

    /// Unit step along the line whose normal has angle index `n`.
    ///
    /// The dominant axis advances by exactly one pixel.
    fn step(&self, n: usize) -> (f64, f64) {
        let (c, s) = self.trig[n];
        let (a, b) = (-s, c);
        if a.abs() > b.abs() {
            (a.signum(), b / a.abs())
        } else {
            (a / b.abs(), b.signum())
        }
    }
}

struct Walk {
    fx: f64,
    fy: f64,
    dx: f64,
    dy: f64,
}

impl Iterator for Walk {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        let p = ((self.fx + 0.5).floor() as i32, (self.fy + 0.5).floor() as i32);
        self.fx += self.dx;
        self.fy += self.dy;
        Some(p)
    }
}

/// Detect line segments in a binary image.
///
/// Returns segments in detection order with endpoints on ink pixels.
pub fn hough_lines_p(pix: &Pix, params: &HoughParams) -> RegionResult<Vec<LineSegment>> {
    check_binary(pix)?;
    params.validate()?;

    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let mut acc = Accumulator::new(pix.width(), pix.height(), params);
    let stride = pix.width() as usize;
    let at = |x: i32, y: i32| y as usize * stride + x as usize;
    let mut mask = vec![false; stride * pix.height() as usize];
    let mut voted = vec![false; stride * pix.height() as usize];
    let mut points = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if pix.get_pixel_unchecked(x as u32, y as u32) != 0 {
                mask[at(x, y)] = true;
                points.push((x, y));
            }
        }
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let inside = |x: i32, y: i32| x >= 0 && y >= 0 && x < w && y < h;
    let threshold = params.threshold as i32;
    let min_len = params.min_line_length as i32;
    let mut lines = Vec::new();

    for &(x, y) in &points {
        let idx = at(x, y);
        // already consumed by an earlier line
        if !mask[idx] {
            continue;
        }
        let (best, n) = acc.vote(x, y);
        voted[idx] = true;
        if best < threshold {
            continue;
        }

        let (dx0, dy0) = acc.step(n);
        let walk = |k: usize| {
            let sign = if k == 0 { 1.0 } else { -1.0 };
            Walk {
                fx: x as f64,
                fy: y as f64,
                dx: dx0 * sign,
                dy: dy0 * sign,
            }
        };

        let mut ends = [(x, y); 2];
        for (k, end) in ends.iter_mut().enumerate() {
            let mut gap = 0;
            for (px, py) in walk(k) {
                if !inside(px, py) {
                    break;
                }
                if mask[at(px, py)] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap > params.max_line_gap {
                        break;
                    }
                }
            }
        }

        let good = (ends[1].0 - ends[0].0).abs() >= min_len
            || (ends[1].1 - ends[0].1).abs() >= min_len;

        for (k, &end) in ends.iter().enumerate() {
            for (px, py) in walk(k) {
                if !inside(px, py) {
                    break;
                }
                let i = at(px, py);
                if mask[i] {
                    if good && voted[i] {
                        acc.unvote(px, py);
                    }
                    mask[i] = false;
                }
                if (px, py) == end {
                    break;
                }
            }
        }

        if good {
            lines.push(LineSegment::new(ends[0].0, ends[0].1, ends[1].0, ends[1].1));
            if params.max_lines > 0 && lines.len() >= params.max_lines {
                break;
            }
        }
    }

    log::debug!(
        "hough: {} ink pixels -> {} segments",
        points.len(),
        lines.len()
    );
    Ok(lines)
}
