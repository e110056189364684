//! Error taxonomy of the reconstruction core.
//!
//! Every variant is raised before any state is touched, so a failed call
//! leaves the engine exactly as it was.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconstructError {
    /// Zero-area image, or a pixel buffer too short for its geometry.
    #[error("invalid image: {width}x{height}")]
    InvalidImage { width: usize, height: usize },

    /// Corruption probability outside [0, 1] (or NaN).
    #[error("corruption probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Non-positive or non-finite gradient step size.
    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f32),

    /// Two grids that must share a geometry do not.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, ReconstructError>;
