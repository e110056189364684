//! Per-pixel corruption mask.
//!
//! `true` marks a pixel whose original value is unknown and must be
//! reconstructed. Masks are drawn once, by one Bernoulli trial per pixel,
//! from a caller-supplied random source, and never change afterwards.
use crate::error::{ReconstructError, Result};
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorruptionMask {
    w: usize,
    h: usize,
    data: Vec<bool>,
}

impl CorruptionMask {
    /// Draw a `w × h` mask where each pixel is corrupted with probability `p`.
    ///
    /// Uses `u < p` with `u` uniform in `[0, 1)`, so `p = 0` corrupts nothing
    /// and `p = 1` corrupts everything.
    pub fn sample<R: Rng + ?Sized>(w: usize, h: usize, p: f64, rng: &mut R) -> Result<Self> {
        validate_probability(p)?;
        if w == 0 || h == 0 {
            return Err(ReconstructError::InvalidImage {
                width: w,
                height: h,
            });
        }
        let len = w.checked_mul(h).ok_or(ReconstructError::InvalidImage {
            width: w,
            height: h,
        })?;
        let data = (0..len).map(|_| rng.gen::<f64>() < p).collect();
        Ok(Self { w, h, data })
    }

    /// Build a mask from explicit row-major flags.
    pub fn from_vec(w: usize, h: usize, data: Vec<bool>) -> Result<Self> {
        if w.checked_mul(h) != Some(data.len()) {
            return Err(ReconstructError::DimensionMismatch {
                expected: (w, h),
                actual: (data.len(), 1),
            });
        }
        Ok(Self { w, h, data })
    }

    /// Mask with no corrupted pixel.
    pub fn none(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    pub fn is_corrupted(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    /// Row-major flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn corrupted_count(&self) -> usize {
        self.data.iter().filter(|&&c| c).count()
    }

    pub fn known_count(&self) -> usize {
        self.data.len() - self.corrupted_count()
    }

    /// Share of corrupted pixels in `[0, 1]`.
    pub fn corrupted_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.corrupted_count() as f64 / self.data.len() as f64
    }
}

pub(crate) fn validate_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ReconstructError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn extreme_probabilities_are_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let none = CorruptionMask::sample(16, 9, 0.0, &mut rng).unwrap();
        assert_eq!(none.corrupted_count(), 0);
        let all = CorruptionMask::sample(16, 9, 1.0, &mut rng).unwrap();
        assert_eq!(all.corrupted_count(), 16 * 9);
    }

    #[test]
    fn fraction_tracks_probability() {
        let mut rng = StdRng::seed_from_u64(42);
        for &p in &[0.1, 0.5, 0.9] {
            let mask = CorruptionMask::sample(200, 200, p, &mut rng).unwrap();
            let frac = mask.corrupted_fraction();
            assert!((frac - p).abs() < 0.02, "p={p} frac={frac}");
        }
    }

    #[test]
    fn same_seed_gives_same_mask() {
        let a = CorruptionMask::sample(32, 32, 0.3, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = CorruptionMask::sample(32, 32, 0.3, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        for &p in &[-0.01, 1.01, f64::NAN] {
            let err = CorruptionMask::sample(4, 4, p, &mut rng).unwrap_err();
            assert!(matches!(err, ReconstructError::InvalidProbability(_)));
        }
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = CorruptionMask::sample(usize::MAX, 2, 0.5, &mut rng).unwrap_err();
        assert!(matches!(err, ReconstructError::InvalidImage { .. }));
        assert!(CorruptionMask::from_vec(usize::MAX, 2, vec![false; 2]).is_err());
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(CorruptionMask::from_vec(2, 2, vec![true; 3]).is_err());
        let mask = CorruptionMask::from_vec(2, 2, vec![false, true, false, false]).unwrap();
        assert!(mask.is_corrupted(1, 0));
        assert_eq!(mask.known_count(), 3);
    }
}
