//! Export of engine buffers into caller-owned RGBA surfaces.
//!
//! Each draw overwrites the whole target with `R = G = B = round(v)` and
//! `A = 255`. Draws only read engine state.
use super::ReconstructionEngine;
use crate::error::{ReconstructError, Result};
use crate::image::rgba::CHANNELS;
use crate::image::{ImageF32, RgbaBuffer};
use image::RgbaImage;

/// Intensity shown in place of corrupted pixels.
pub const CORRUPTED_MARKER: u8 = 0;

/// A tightly packed RGBA surface owned by the caller.
pub trait RenderTarget {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (usize, usize);

    /// Interleaved RGBA bytes, `width · height · 4` long.
    fn rgba_mut(&mut self) -> &mut [u8];
}

impl RenderTarget for RgbaBuffer {
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn rgba_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl RenderTarget for RgbaImage {
    fn dimensions(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    fn rgba_mut(&mut self) -> &mut [u8] {
        self
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

impl ReconstructionEngine {
    /// Render the grayscale ground truth.
    pub fn draw_original_image<T: RenderTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        self.fill(target, &self.gray, |_| None)
    }

    /// Render the ground truth with corrupted pixels shown as [`CORRUPTED_MARKER`].
    pub fn draw_corrupted_image<T: RenderTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        let mask = self.mask.as_slice();
        self.fill(target, &self.gray, |i| mask[i].then_some(CORRUPTED_MARKER))
    }

    /// Render the current reconstruction.
    pub fn draw_reconstructed_image<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
    ) -> Result<()> {
        self.fill(target, &self.current, |_| None)
    }

    fn fill<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        src: &ImageF32,
        overlay: impl Fn(usize) -> Option<u8>,
    ) -> Result<()> {
        let dims = target.dimensions();
        if dims != src.dims() {
            return Err(ReconstructError::DimensionMismatch {
                expected: src.dims(),
                actual: dims,
            });
        }
        let bytes = target.rgba_mut();
        if bytes.len() != src.data.len() * CHANNELS {
            return Err(ReconstructError::DimensionMismatch {
                expected: src.dims(),
                actual: (bytes.len() / CHANNELS, 1),
            });
        }
        let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(bytes);
        for (i, (px, &v)) in pixels.iter_mut().zip(&src.data).enumerate() {
            let g = overlay(i).unwrap_or_else(|| to_u8(v));
            *px = [g, g, g, 255];
        }
        Ok(())
    }
}
