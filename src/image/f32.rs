//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Holds intensities on the 0.0..=255.0 scale. Used for the grayscale
//! ground truth and for both buffers of the reconstruction.
use crate::error::{ReconstructError, Result};

/// Upper bound of the intensity scale.
pub const MAX_INTENSITY: f32 = 255.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a buffer of size `w × h` with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap row-major samples. Fails unless `data.len() == w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self> {
        if w.checked_mul(h) != Some(data.len()) {
            return Err(ReconstructError::DimensionMismatch {
                expected: (w, h),
                actual: (data.len(), 1),
            });
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// `(width, height)`
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Whether every sample is finite and inside `[0, MAX_INTENSITY]`.
    pub fn is_valid_intensity(&self) -> bool {
        self.data
            .iter()
            .all(|v| v.is_finite() && (0.0..=MAX_INTENSITY).contains(v))
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
