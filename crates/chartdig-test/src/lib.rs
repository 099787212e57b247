//! chartdig-test - Regression test support for chartdig
//!
//! [`RegParams`] collects checks for one `*_reg` test; its mode comes from
//! the `REGTEST_MODE` environment variable:
//!
//! - `generate`: outputs become the golden files
//! - `compare` (default): outputs are checked against the golden files
//! - `display`: outputs are written for inspection only
//!
//! Test charts are drawn with [`synth::ChartImage`], so no binary
//! fixtures are checked in.
//!
//! ```ignore
//! use chartdig_test::RegParams;
//!
//! let mut rp = RegParams::new("axis");
//! rp.compare_values(180.0, row as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use synth::ChartImage;

// this crate lives two levels below the workspace root
fn workspace_root() -> String {
    format!("{}/../..", env!("CARGO_MANIFEST_DIR"))
}

/// Directory of checked-in golden outputs
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Directory of outputs written by the current run
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
