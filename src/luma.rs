//! RGBA → luminance conversion.
//!
//! Alpha is ignored; the weighted sum is clamped to [0, 255].
use crate::image::{ImageF32, ImageRgba8, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};

/// Per-channel weights of the luminance sum `r·R + g·G + b·B`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LumaWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LumaWeights {
    /// ITU-R BT.601 luma.
    pub const BT601: Self = Self {
        r: 0.299,
        g: 0.587,
        b: 0.114,
    };

    /// "Luminosity method" weights favouring green more strongly.
    pub const LUMINOSITY: Self = Self {
        r: 0.21,
        g: 0.72,
        b: 0.07,
    };

    #[inline]
    pub fn apply(&self, px: [u8; 4]) -> f32 {
        let v = self.r * px[0] as f32 + self.g * px[1] as f32 + self.b * px[2] as f32;
        v.clamp(0.0, 255.0)
    }
}

impl Default for LumaWeights {
    fn default() -> Self {
        Self::BT601
    }
}

/// Convert an RGBA view into a single-channel intensity image.
pub fn to_grayscale(src: &ImageRgba8<'_>, weights: LumaWeights) -> ImageF32 {
    let mut out = ImageF32::new(src.w, src.h);
    for (y, row) in src.rows().enumerate() {
        for (dst, &px) in out.row_mut(y).iter_mut().zip(row) {
            *dst = weights.apply(px);
        }
    }
    out
}
