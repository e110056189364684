//! Construction-time knobs of the reconstruction engine.
//!
//! Both settings shape the convergence trajectory, so reproducible runs
//! must hold them fixed alongside the mask and the step size.
use crate::image::{ImageF32, MAX_INTENSITY};
use crate::luma::LumaWeights;
use crate::mask::CorruptionMask;
use serde::{Deserialize, Serialize};

/// Value written into corrupted pixels before the first gradient step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialFill {
    /// Start every unknown pixel at black.
    Zero,
    /// Mean intensity of the known pixels (0 when none is known).
    KnownMean,
    /// Fixed intensity, clamped to [0, 255].
    Constant(f32),
}

impl Default for InitialFill {
    fn default() -> Self {
        Self::KnownMean
    }
}

impl InitialFill {
    /// Resolve the fill intensity for a given ground truth and mask.
    pub fn resolve(&self, gray: &ImageF32, mask: &CorruptionMask) -> f32 {
        match *self {
            Self::Zero => 0.0,
            Self::Constant(v) if v.is_finite() => v.clamp(0.0, MAX_INTENSITY),
            Self::Constant(_) => 0.0,
            Self::KnownMean => {
                let mut sum = 0.0f64;
                let mut count = 0usize;
                for (&v, &corrupted) in gray.data.iter().zip(mask.as_slice()) {
                    if !corrupted {
                        sum += v as f64;
                        count += 1;
                    }
                }
                if count == 0 {
                    0.0
                } else {
                    (sum / count as f64) as f32
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Luminance weights used for the RGBA → gray conversion.
    pub luma: LumaWeights,
    /// Starting value of corrupted pixels.
    pub initial_fill: InitialFill,
}

impl EngineOptions {
    pub fn with_initial_fill(mut self, fill: InitialFill) -> Self {
        self.initial_fill = fill;
        self
    }

    pub fn with_luma(mut self, luma: LumaWeights) -> Self {
        self.luma = luma;
        self
    }
}
