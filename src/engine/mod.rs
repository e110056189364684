//! Reconstruction engine: grayscale ground truth, corruption mask and the
//! evolving reconstruction.
//!
//! Lifecycle: construct once per source image and probability, call
//! [`ReconstructionEngine::gradient_step`] any number of times, render
//! snapshots in between. Resetting means constructing a new engine; a fresh
//! mask is drawn each time.
pub mod options;
pub mod render;
pub mod step;

pub use self::options::{EngineOptions, InitialFill};
pub use self::render::{RenderTarget, CORRUPTED_MARKER};
pub use self::step::{StepStats, STABLE_ETA_LIMIT};

use crate::error::{ReconstructError, Result};
use crate::image::{ImageF32, ImageRgba8, MAX_INTENSITY};
use crate::luma::to_grayscale;
use crate::mask::{validate_probability, CorruptionMask};
use log::debug;
use rand::Rng;
use std::mem;

/// Owns the ground truth, the mask and a double-buffered reconstruction.
#[derive(Clone, Debug)]
pub struct ReconstructionEngine {
    gray: ImageF32,
    mask: CorruptionMask,
    current: ImageF32,
    next: ImageF32,
    /// Linear indices of corrupted pixels, ascending.
    free: Vec<usize>,
    iterations: u64,
}

impl ReconstructionEngine {
    /// Build an engine with default options and a freshly seeded RNG.
    ///
    /// Two engines built from the same image get independent masks.
    pub fn new(source: ImageRgba8<'_>, p: f64) -> Result<Self> {
        Self::with_rng(source, p, EngineOptions::default(), &mut rand::thread_rng())
    }

    /// Build an engine drawing the mask from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        source: ImageRgba8<'_>,
        p: f64,
        options: EngineOptions,
        rng: &mut R,
    ) -> Result<Self> {
        // Fields of the view are public; re-check the geometry.
        let source = ImageRgba8::with_stride(source.w, source.h, source.stride, source.data)?;
        validate_probability(p)?;
        let gray = to_grayscale(&source, options.luma);
        let mask = CorruptionMask::sample(gray.w, gray.h, p, rng)?;
        debug!(
            "ReconstructionEngine::new {}x{} p={:.3} corrupted={}",
            gray.w,
            gray.h,
            p,
            mask.corrupted_count()
        );
        Self::from_parts(gray, mask, options)
    }

    /// Build an engine from an explicit grayscale image and mask.
    ///
    /// Intensities of `gray` are clamped to [0, 255] and non-finite samples
    /// (NaN, ±inf) become 0. `options.luma` is unused.
    pub fn from_parts(
        mut gray: ImageF32,
        mask: CorruptionMask,
        options: EngineOptions,
    ) -> Result<Self> {
        if gray.w == 0 || gray.h == 0 {
            return Err(ReconstructError::InvalidImage {
                width: gray.w,
                height: gray.h,
            });
        }
        if mask.dims() != gray.dims() {
            return Err(ReconstructError::DimensionMismatch {
                expected: gray.dims(),
                actual: mask.dims(),
            });
        }
        for v in &mut gray.data {
            let x = *v;
            *v = if x.is_finite() { x.clamp(0.0, MAX_INTENSITY) } else { 0.0 };
        }

        let fill = options.initial_fill.resolve(&gray, &mask);
        let mut current = gray.clone();
        let mut free = Vec::with_capacity(mask.corrupted_count());
        for (i, &corrupted) in mask.as_slice().iter().enumerate() {
            if corrupted {
                current.data[i] = fill;
                free.push(i);
            }
        }
        debug!(
            "ReconstructionEngine::from_parts {}x{} free={} fill={:.2}",
            gray.w,
            gray.h,
            free.len(),
            fill
        );
        let next = current.clone();
        Ok(Self {
            gray,
            mask,
            current,
            next,
            free,
            iterations: 0,
        })
    }

    /// Advance the reconstruction by one synchronous gradient step.
    ///
    /// Every corrupted pixel moves by `−eta · Σ_j (x_i − x_j)` over its
    /// in-grid 4-neighbors, computed from the state at the start of the call,
    /// then is clamped to [0, 255]. Known pixels never change. Large `eta`
    /// may oscillate or saturate; that is reported through [`StepStats`],
    /// not as an error.
    pub fn gradient_step(&mut self, eta: f32) -> Result<StepStats> {
        validate_step_size(eta)?;
        Ok(self.step_unchecked(eta))
    }

    /// Run `steps` gradient steps; returns the stats of the last one.
    pub fn gradient_steps(&mut self, eta: f32, steps: usize) -> Result<Option<StepStats>> {
        validate_step_size(eta)?;
        let mut last = None;
        for _ in 0..steps {
            last = Some(self.step_unchecked(eta));
        }
        Ok(last)
    }

    fn step_unchecked(&mut self, eta: f32) -> StepStats {
        let (max_abs_change, clamped) =
            step::jacobi_step(&self.current, &mut self.next, &self.free, eta);
        mem::swap(&mut self.current, &mut self.next);
        self.iterations += 1;
        debug!(
            "ReconstructionEngine::gradient_step iter={} eta={} max_change={:.4} clamped={}",
            self.iterations, eta, max_abs_change, clamped
        );
        StepStats {
            iteration: self.iterations,
            max_abs_change,
            clamped,
        }
    }

    pub fn width(&self) -> usize {
        self.gray.w
    }

    pub fn height(&self) -> usize {
        self.gray.h
    }

    /// Grayscale ground truth.
    pub fn grayscale(&self) -> &ImageF32 {
        &self.gray
    }

    pub fn mask(&self) -> &CorruptionMask {
        &self.mask
    }

    /// Current reconstruction.
    pub fn reconstructed(&self) -> &ImageF32 {
        &self.current
    }

    /// Ground truth with corrupted pixels replaced by [`CORRUPTED_MARKER`].
    pub fn corrupted_image(&self) -> ImageF32 {
        let mut out = self.gray.clone();
        for &i in &self.free {
            out.data[i] = CORRUPTED_MARKER as f32;
        }
        out
    }

    /// Number of gradient steps applied since construction.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Smoothness energy of the current reconstruction.
    pub fn energy(&self) -> f64 {
        step::energy(&self.current, &self.free)
    }

    /// RMS error against the ground truth over corrupted pixels.
    pub fn rmse(&self) -> f64 {
        if self.free.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .free
            .iter()
            .map(|&i| {
                let d = self.current.data[i] as f64 - self.gray.data[i] as f64;
                d * d
            })
            .sum();
        (sum / self.free.len() as f64).sqrt()
    }
}

fn validate_step_size(eta: f32) -> Result<()> {
    if eta.is_finite() && eta > 0.0 {
        Ok(())
    } else {
        Err(ReconstructError::InvalidStepSize(eta))
    }
}
