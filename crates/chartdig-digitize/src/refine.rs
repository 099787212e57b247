//! Point refinement
//!
//! Cleans a raw curve sample into a function-like sequence:
//!
//! 1. sort by x and merge points closer than `dedup_epsilon` in x
//! 2. drop isolated y outliers
//! 3. weighted moving-average smoothing of y
//! 4. optional resampling onto new x positions
//!
//! Every step is pure and deterministic, and the output is strictly
//! increasing in x.

use chartdig_core::Point;
use serde::{Deserialize, Serialize};

/// Largest number of positions [`resample`] will generate.
pub const MAX_RESAMPLE_POINTS: usize = 1_000_000;

/// Where [`resample`] places output points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Keep the refined points
    #[default]
    None,
    /// `n` evenly spaced positions across the observed x range
    Count(usize),
    /// Positions `x_first, x_first + dx, ...` up to the last observed x
    Step(f64),
    /// Explicit positions. Non-finite values are ignored and repeated
    /// values collapse, so the output has one point per distinct position.
    Grid(Vec<f64>),
}

/// Point refiner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Points within this x distance of a cluster's first point are merged
    pub dedup_epsilon: f64,
    /// |z| above which a point is an outlier candidate; non-positive disables
    pub z_threshold: f64,
    /// Odd smoothing window; 0 or 1 disables smoothing
    pub smoothing_window: usize,
    pub resample: Resample,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            dedup_epsilon: 0.5,
            z_threshold: 3.0,
            smoothing_window: 5,
            resample: Resample::None,
        }
    }
}

/// Run all refinement steps.
pub fn refine(points: &[Point], options: &RefineOptions) -> Vec<Point> {
    let merged = dedup(points, options.dedup_epsilon);
    let kept = reject_outliers(&merged, options.z_threshold);
    let smoothed = smooth(&kept, options.smoothing_window);
    let out = resample(&smoothed, &options.resample);
    log::debug!(
        "refine: {} -> {} merged -> {} kept -> {} out",
        points.len(),
        merged.len(),
        kept.len(),
        out.len()
    );
    out
}

/// Stable sort by x, then merge each run of points whose x lies within
/// `epsilon` of the run's first point into the run's mean.
///
/// Non-finite points are discarded.
pub fn dedup(points: &[Point], epsilon: f64) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.iter().copied().filter(Point::is_finite).collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let epsilon = epsilon.max(0.0);
    let mut out = Vec::with_capacity(sorted.len());
    let mut i = 0;
    while i < sorted.len() {
        let first = sorted[i].x;
        let mut j = i + 1;
        while j < sorted.len() && sorted[j].x - first <= epsilon {
            j += 1;
        }
        let run = &sorted[i..j];
        let n = run.len() as f64;
        let (sx, sy) = run.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        out.push(Point::new(sx / n, sy / n));
        i = j;
    }
    out
}

/// Drop interior points that are both statistical outliers in y and far
/// from the line through their two neighbours.
///
/// A point is dropped when `|z| > z_threshold` and its distance to the
/// linear expectation from its neighbours exceeds the neighbours' own
/// `|Δy|`. Decisions use the input neighbours, not the filtered sequence.
pub fn reject_outliers(points: &[Point], z_threshold: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 || z_threshold <= 0.0 {
        return points.to_vec();
    }
    let mean = points.iter().map(|p| p.y).sum::<f64>() / n as f64;
    let var = points.iter().map(|p| (p.y - mean).powi(2)).sum::<f64>() / n as f64;
    let sd = var.sqrt();
    if sd == 0.0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(n);
    out.push(points[0]);
    for i in 1..n - 1 {
        let (prev, p, next) = (points[i - 1], points[i], points[i + 1]);
        let z = (p.y - mean) / sd;
        if z.abs() > z_threshold {
            let t = (p.x - prev.x) / (next.x - prev.x);
            let expected = prev.y + t * (next.y - prev.y);
            if (p.y - expected).abs() > (next.y - prev.y).abs() {
                continue;
            }
        }
        out.push(p);
    }
    out.push(points[n - 1]);
    out
}

/// Centered weighted moving average of y with weight `1 / (1 + |offset|)`.
///
/// Even windows are rounded up to the next odd size. Near the ends the
/// window shrinks symmetrically so it never reaches past either end.
pub fn smooth(points: &[Point], window: usize) -> Vec<Point> {
    if window <= 1 || points.len() < 3 {
        return points.to_vec();
    }
    let half = window / 2;
    let n = points.len();
    (0..n)
        .map(|i| {
            let r = half.min(i).min(n - 1 - i);
            let mut sum = 0.0;
            let mut wsum = 0.0;
            for j in i - r..=i + r {
                let w = 1.0 / (1.0 + j.abs_diff(i) as f64);
                sum += w * points[j].y;
                wsum += w;
            }
            Point::new(points[i].x, sum / wsum)
        })
        .collect()
}

/// Linear interpolation of y at `x` over points sorted by x.
///
/// Outside the observed range the nearest endpoint's y is returned.
pub fn interpolate(points: &[Point], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x <= first.x {
        return Some(first.y);
    }
    if x >= last.x {
        return Some(last.y);
    }
    let idx = points.partition_point(|p| p.x < x);
    let (a, b) = (points[idx - 1], points[idx]);
    if b.x == x {
        return Some(b.y);
    }
    let t = (x - a.x) / (b.x - a.x);
    Some(a.y + t * (b.y - a.y))
}

fn targets(points: &[Point], mode: &Resample) -> Option<Vec<f64>> {
    let (lo, hi) = (points.first()?.x, points.last()?.x);
    let xs = match mode {
        Resample::None => return None,
        Resample::Count(0) => Vec::new(),
        Resample::Count(1) => vec![lo],
        Resample::Count(n) if *n > MAX_RESAMPLE_POINTS => {
            log::warn!("resample count {} exceeds {}, keeping points", n, MAX_RESAMPLE_POINTS);
            return None;
        }
        Resample::Count(n) => {
            if hi <= lo {
                vec![lo]
            } else {
                let step = (hi - lo) / (*n - 1) as f64;
                // last target pinned to the endpoint against rounding
                (0..*n)
                    .map(|i| if i + 1 == *n { hi } else { lo + step * i as f64 })
                    .collect()
            }
        }
        Resample::Step(dx) => {
            if !(*dx > 0.0 && dx.is_finite()) {
                log::warn!("resample step {} is not positive, keeping points", dx);
                return None;
            }
            let steps = ((hi - lo) / dx + 1e-9).floor();
            let count = if steps.is_finite() && steps < MAX_RESAMPLE_POINTS as f64 {
                (steps as usize).checked_add(1)
            } else {
                None
            };
            let Some(count) = count else {
                log::warn!(
                    "resample step {} gives more than {} positions, keeping points",
                    dx,
                    MAX_RESAMPLE_POINTS
                );
                return None;
            };
            (0..count).map(|i| lo + dx * i as f64).collect()
        }
        Resample::Grid(grid) => {
            let mut xs: Vec<f64> = grid.iter().copied().filter(|x| x.is_finite()).collect();
            xs.sort_by(f64::total_cmp);
            xs.dedup();
            xs
        }
    };
    Some(xs)
}

/// Resample points sorted by x onto the positions described by `mode`.
///
/// An empty input stays empty. [`Resample::Count`] over a single x
/// position yields that one point. A mode asking for more than
/// [`MAX_RESAMPLE_POINTS`] positions leaves the points unchanged.
pub fn resample(points: &[Point], mode: &Resample) -> Vec<Point> {
    let Some(xs) = targets(points, mode) else {
        return points.to_vec();
    };
    xs.into_iter()
        .filter_map(|x| interpolate(points, x).map(|y| Point::new(x, y)))
        .collect()
}
