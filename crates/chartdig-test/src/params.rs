//! Regression test parameters and checks

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use chartdig_core::{Pix, Point};
use std::fs;
use std::path::{Path, PathBuf};

/// Regression test mode, read from `REGTEST_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Write outputs as the new golden files
    Generate,
    /// Check outputs against the golden files
    #[default]
    Compare,
    /// Write outputs only
    Display,
}

impl RegTestMode {
    pub fn from_env() -> Self {
        let mode = std::env::var("REGTEST_MODE").unwrap_or_default();
        match mode.to_ascii_lowercase().as_str() {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// State of one regression test.
///
/// Every check advances a running index used to name output files and
/// failure reports. Checks record failures instead of panicking; the test
/// asserts on [`RegParams::cleanup`] at the end.
pub struct RegParams {
    pub test_name: String,
    pub mode: RegTestMode,
    index: usize,
    failures: Vec<String>,
}

impl RegParams {
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());
        eprintln!("\n=== {}_reg ({:?}) ===", test_name, mode);

        Self {
            test_name: test_name.to_string(),
            mode,
            index: 0,
            failures: Vec::new(),
        }
    }

    /// Index of the most recent check
    pub fn index(&self) -> usize {
        self.index
    }

    fn next(&mut self) -> usize {
        self.index += 1;
        self.index
    }

    fn fail(&mut self, what: &str, detail: String) {
        let msg = format!(
            "{}_reg [{}] {} failed: {}",
            self.test_name, self.index, what, detail
        );
        eprintln!("{}", msg);
        self.failures.push(msg);
    }

    /// Check `|expected - actual| <= delta`. NaN never passes.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.next();
        let diff = (expected - actual).abs();
        if diff <= delta {
            return true;
        }
        self.fail(
            "value",
            format!("expected {expected}, got {actual} (diff {diff} > {delta})"),
        );
        false
    }

    pub fn compare_bool(&mut self, expected: bool, actual: bool) -> bool {
        self.next();
        if expected == actual {
            return true;
        }
        self.fail("bool", format!("expected {expected}, got {actual}"));
        false
    }

    /// Check two point sequences pairwise, each coordinate within `delta`.
    pub fn compare_points(&mut self, expected: &[Point], actual: &[Point], delta: f64) -> bool {
        self.next();
        if expected.len() != actual.len() {
            self.fail(
                "points",
                format!("{} points expected, got {}", expected.len(), actual.len()),
            );
            return false;
        }
        let bad = expected
            .iter()
            .zip(actual)
            .position(|(e, a)| !((e.x - a.x).abs() <= delta && (e.y - a.y).abs() <= delta));
        match bad {
            None => true,
            Some(i) => {
                let (e, a) = (expected[i], actual[i]);
                self.fail(
                    "points",
                    format!("point {i}: expected ({}, {}), got ({}, {})", e.x, e.y, a.x, a.y),
                );
                false
            }
        }
    }

    /// Check two images for equal size, depth and pixels.
    pub fn compare_pix(&mut self, expected: &Pix, actual: &Pix) -> bool {
        self.next();
        if !expected.sizes_equal(actual) {
            self.fail(
                "pix",
                format!(
                    "{}x{} {:?} vs {}x{} {:?}",
                    expected.width(),
                    expected.height(),
                    expected.depth(),
                    actual.width(),
                    actual.height(),
                    actual.depth()
                ),
            );
            return false;
        }
        match first_pixel_mismatch(expected, actual) {
            None => true,
            Some((x, y)) => {
                self.fail("pix", format!("pixels differ at ({x}, {y})"));
                false
            }
        }
    }

    pub fn compare_strings(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.next();
        if expected == actual {
            return true;
        }
        let at = expected
            .iter()
            .zip(actual)
            .position(|(a, b)| a != b)
            .unwrap_or(expected.len().min(actual.len()));
        self.fail(
            "bytes",
            format!("{} vs {} bytes, first difference at {at}", expected.len(), actual.len()),
        );
        false
    }

    /// Write an image as PNG to the output directory and check it against
    /// its golden file.
    pub fn write_pix_and_check(&mut self, pix: &Pix) -> TestResult<()> {
        self.next();
        let path = self.output_path("png");
        chartdig_io::write_image(pix, &path).map_err(|e| TestError::ImageWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.check_golden(&path, "png")
    }

    /// Write bytes to the output directory and check them against their
    /// golden file.
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.next();
        let path = self.output_path(ext);
        fs::write(&path, data)?;
        self.check_golden(&path, ext)
    }

    fn output_path(&self, ext: &str) -> PathBuf {
        Path::new(&regout_dir()).join(format!("{}.{:02}.{}", self.test_name, self.index, ext))
    }

    fn golden_path(&self, ext: &str) -> PathBuf {
        Path::new(&golden_dir()).join(format!(
            "{}_golden.{:02}.{}",
            self.test_name, self.index, ext
        ))
    }

    /// A missing golden file in compare mode is reported, not failed.
    fn check_golden(&mut self, output: &Path, ext: &str) -> TestResult<()> {
        let golden = self.golden_path(ext);
        match self.mode {
            RegTestMode::Generate => {
                fs::copy(output, &golden)?;
                eprintln!("generated {}", golden.display());
            }
            RegTestMode::Compare if !golden.exists() => {
                eprintln!("no golden file yet: {}", golden.display());
            }
            RegTestMode::Compare => {
                let same = fs::read(output)? == fs::read(&golden)?
                    || (ext == "png" && same_image(output, &golden));
                if !same {
                    self.fail(
                        "golden",
                        format!("{} differs from {}", output.display(), golden.display()),
                    );
                }
            }
            RegTestMode::Display => {}
        }
        Ok(())
    }

    /// Report the outcome; `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("SUCCESS: {}_reg ({} checks)", self.test_name, self.index);
            return true;
        }
        eprintln!("FAILURE: {}_reg", self.test_name);
        for failure in &self.failures {
            eprintln!("  {}", failure);
        }
        false
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

fn first_pixel_mismatch(a: &Pix, b: &Pix) -> Option<(u32, u32)> {
    (0..a.height())
        .flat_map(|y| (0..a.width()).map(move |x| (x, y)))
        .find(|&(x, y)| a.get_pixel(x, y) != b.get_pixel(x, y))
}

/// Decoded comparison, for encoders that do not reproduce bytes exactly.
fn same_image(a: &Path, b: &Path) -> bool {
    match (chartdig_io::read_image(a), chartdig_io::read_image(b)) {
        (Ok(pa), Ok(pb)) => pa.sizes_equal(&pb) && first_pixel_mismatch(&pa, &pb).is_none(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdig_core::PixelDepth;

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("params_values");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.compare_values(0.0, f64::NAN, 1.0));
        assert_eq!(rp.index(), 3);
        assert_eq!(rp.failures().len(), 2);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_points() {
        let mut rp = RegParams::new("params_points");
        let a = [Point::new(0.0, 1.0), Point::new(2.0, 3.0)];
        let b = [Point::new(0.0, 1.05), Point::new(2.0, 3.0)];
        assert!(rp.compare_points(&a, &b, 0.1));
        assert!(!rp.compare_points(&a, &b, 0.01));
        assert!(!rp.compare_points(&a, &b[..1], 1.0));
        assert!(rp.failures()[0].contains("point 0"));
    }

    #[test]
    fn test_compare_pix_dimension_mismatch() {
        let mut rp = RegParams::new("params_pix");
        let a = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let b = Pix::new(4, 5, PixelDepth::Bit8).unwrap();
        assert!(rp.compare_pix(&a, &a.clone()));
        assert!(!rp.compare_pix(&a, &b));
    }

    #[test]
    fn test_compare_strings_reports_offset() {
        let mut rp = RegParams::new("params_bytes");
        assert!(rp.compare_strings(b"X,CFM", b"X,CFM"));
        assert!(!rp.compare_strings(b"X,CFM", b"X,m3"));
        assert!(rp.failures()[0].contains("first difference at 2"));
    }
}
