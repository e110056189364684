//! Interleaved 8-bit RGBA buffers.
//!
//! `ImageRgba8` borrows the host's source pixels (e.g. decoded image data
//! or a canvas readback); `RgbaBuffer` is an owned surface the engine can
//! render into. Rows are exposed as `[u8; 4]` pixels.
use crate::error::{ReconstructError, Result};
use crate::image::traits::ImageView;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

#[derive(Clone, Copy, Debug)]
pub struct ImageRgba8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageRgba8<'a> {
    /// Borrow a tightly packed `w × h` RGBA buffer.
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Result<Self> {
        let stride = w
            .checked_mul(CHANNELS)
            .ok_or(ReconstructError::InvalidImage {
                width: w,
                height: h,
            })?;
        Self::with_stride(w, h, stride, data)
    }

    /// Borrow an RGBA buffer whose rows are `stride` bytes apart.
    ///
    /// Fails with `InvalidImage` for zero-area geometry, a stride that is not
    /// a whole number of pixels, a buffer too short for the geometry, or a
    /// geometry whose byte size overflows `usize`.
    pub fn with_stride(w: usize, h: usize, stride: usize, data: &'a [u8]) -> Result<Self> {
        let invalid = ReconstructError::InvalidImage {
            width: w,
            height: h,
        };
        if w == 0 || h == 0 || stride % CHANNELS != 0 {
            return Err(invalid);
        }
        let row_bytes = w.checked_mul(CHANNELS).ok_or(invalid.clone())?;
        if stride < row_bytes {
            return Err(invalid);
        }
        let required = stride
            .checked_mul(h - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or(invalid.clone())?;
        if data.len() < required {
            return Err(invalid);
        }
        Ok(Self { w, h, stride, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        self.row(y)[x]
    }
}

impl<'a> ImageView for ImageRgba8<'a> {
    type Pixel = [u8; 4];

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
        self.stride / CHANNELS
    }
    #[inline]
    fn row(&self, y: usize) -> &[[u8; 4]] {
        let start = y * self.stride;
        bytemuck::cast_slice(&self.data[start..start + self.w * CHANNELS])
    }
    #[inline]
    fn as_slice(&self) -> Option<&[[u8; 4]]> {
        self.is_contiguous()
            .then(|| bytemuck::cast_slice(&self.data[..self.w * self.h * CHANNELS]))
    }
}

/// Owned, tightly packed RGBA surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Transparent black surface of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Take ownership of raw RGBA bytes. Fails unless the length matches.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS));
        if expected != Some(data.len()) {
            return Err(ReconstructError::InvalidImage { width, height });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw interleaved bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrow as a read-only `ImageRgba8` view
    pub fn as_view(&self) -> ImageRgba8<'_> {
        ImageRgba8 {
            w: self.width,
            h: self.height,
            stride: self.width * CHANNELS,
            data: &self.data,
        }
    }
}

impl ImageView for RgbaBuffer {
    type Pixel = [u8; 4];

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.width
    }
    #[inline]
    fn row(&self, y: usize) -> &[[u8; 4]] {
        let start = y * self.width * CHANNELS;
        bytemuck::cast_slice(&self.data[start..start + self.width * CHANNELS])
    }
    #[inline]
    fn as_slice(&self) -> Option<&[[u8; 4]]> {
        Some(bytemuck::cast_slice(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_view_skips_padding() {
        // 2×2 image, rows padded to 3 pixels.
        let mut bytes = vec![0u8; 12 + 8];
        bytes[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let view = ImageRgba8::with_stride(2, 2, 12, &bytes).unwrap();
        assert!(!view.is_contiguous());
        assert!(view.as_slice().is_none());
        assert_eq!(view.get(0, 1), [1, 2, 3, 4]);
        assert_eq!(view.row(1).len(), 2);
    }

    #[test]
    fn rejects_empty_and_short_buffers() {
        assert!(ImageRgba8::new(0, 3, &[]).is_err());
        assert!(ImageRgba8::new(2, 2, &[0u8; 15]).is_err());
        assert!(ImageRgba8::with_stride(2, 2, 9, &[0u8; 32]).is_err());
        assert!(RgbaBuffer::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn buffer_bytes_are_visible_through_view() {
        let mut buf = RgbaBuffer::new(3, 2);
        buf.as_bytes_mut()[20..24].copy_from_slice(&[9, 9, 9, 255]);
        assert_eq!(buf.row(1)[2], [9, 9, 9, 255]);
        assert_eq!(buf.as_view().get(2, 1), [9, 9, 9, 255]);
    }

    #[test]
    fn overflowing_geometry_is_rejected() {
        let wide = usize::MAX / CHANNELS + 1;
        let err = ImageRgba8::with_stride(wide, 1, 0, &[]).unwrap_err();
        assert_eq!(
            err,
            ReconstructError::InvalidImage {
                width: wide,
                height: 1
            }
        );
        assert!(ImageRgba8::new(wide, 1, &[]).is_err());
        assert!(ImageRgba8::with_stride(1, 3, usize::MAX / 2 + 1, &[0u8; 4]).is_err());
        assert!(ImageRgba8::with_stride(1, usize::MAX, 4, &[0u8; 4]).is_err());
        assert!(RgbaBuffer::from_raw(usize::MAX / 2, 3, vec![0; 8]).is_err());
    }
}
