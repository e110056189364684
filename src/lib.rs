#![doc = include_str!("../README.md")]

// Public modules
pub mod config;
pub mod engine;
pub mod error;
pub mod image;
pub mod luma;
pub mod mask;

// --- High-level re-exports -------------------------------------------------

// Main entry point and its knobs.
pub use crate::engine::{
    EngineOptions, InitialFill, ReconstructionEngine, RenderTarget, StepStats, CORRUPTED_MARKER,
    STABLE_ETA_LIMIT,
};
pub use crate::error::{ReconstructError, Result};
pub use crate::luma::LumaWeights;
pub use crate::mask::CorruptionMask;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use image_reconstruct::prelude::*;
///
/// # fn main() -> image_reconstruct::Result<()> {
/// let (w, h) = (64usize, 48usize);
/// let rgba = vec![128u8; w * h * 4];
/// let source = ImageRgba8::new(w, h, &rgba)?;
///
/// let mut engine = ReconstructionEngine::new(source, 0.3)?;
/// for _ in 0..10 {
///     engine.gradient_step(0.2)?;
/// }
///
/// let mut out = RgbaBuffer::new(w, h);
/// engine.draw_reconstructed_image(&mut out)?;
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageRgba8, RgbaBuffer};
    pub use crate::{CorruptionMask, EngineOptions, InitialFill, ReconstructionEngine};
}
