//! Error types for chartdig-region

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] chartdig_core::Error),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The vision engine did not become ready in time, or failed to load
    #[error("vision engine unavailable after {waited:?}: {reason}; retry once it has loaded")]
    EngineUnavailable { waited: Duration, reason: String },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

pub(crate) fn check_binary(pix: &chartdig_core::Pix) -> RegionResult<()> {
    if pix.depth() != chartdig_core::PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}
