//! Jacobi gradient step on the discrete smoothness energy
//!
//! `E = Σ_{corrupted i} Σ_{j ∈ N4(i)} (x_i − x_j)²`
//!
//! Only corrupted pixels are free variables. Neighbors outside the grid are
//! absent (no wrapping, no mirroring). Each step reads `current` only and
//! writes `next` only, so the result does not depend on traversal order.
//!
//! Complexity: O(#corrupted) per step.
use crate::image::{ImageF32, MAX_INTENSITY};
use serde::Serialize;

/// Stability bound `2 / λ_max(L) = 1 / max degree` for the 4-neighbor
/// Laplacian (`λ_max ≤ 2 · 4`). Below it a step never amplifies the free
/// variables; it is a strict contraction only when at least one known pixel
/// anchors each corrupted region (not the case for `p = 1`).
pub const STABLE_ETA_LIMIT: f32 = 0.25;

/// Summary of one gradient step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStats {
    /// 1-based index of this step since construction.
    pub iteration: u64,
    /// Largest absolute change applied to a pixel.
    pub max_abs_change: f32,
    /// Number of updates that fell outside [0, 255] and were clamped.
    pub clamped: usize,
}

/// Visit the in-grid 4-neighbors of the pixel at linear index `idx`.
#[inline]
pub(crate) fn for_each_neighbor(idx: usize, w: usize, h: usize, mut f: impl FnMut(usize)) {
    let x = idx % w;
    let y = idx / w;
    if x > 0 {
        f(idx - 1);
    }
    if x + 1 < w {
        f(idx + 1);
    }
    if y > 0 {
        f(idx - w);
    }
    if y + 1 < h {
        f(idx + w);
    }
}

/// Local gradient `Σ_j (x_i − x_j)` at `idx`.
#[inline]
pub(crate) fn local_gradient(img: &ImageF32, idx: usize) -> f32 {
    let xi = img.data[idx];
    let mut g = 0.0f32;
    for_each_neighbor(idx, img.w, img.h, |j| g += xi - img.data[j]);
    g
}

/// Write `next[i] = clamp(current[i] − eta · g_i)` for every free index.
///
/// Entries of `next` outside `free` are left untouched; the caller keeps
/// them equal to `current`.
pub(crate) fn jacobi_step(
    current: &ImageF32,
    next: &mut ImageF32,
    free: &[usize],
    eta: f32,
) -> (f32, usize) {
    debug_assert_eq!(current.dims(), next.dims());
    let mut max_abs_change = 0.0f32;
    let mut clamped = 0usize;
    for &i in free {
        let xi = current.data[i];
        let raw = xi - eta * local_gradient(current, i);
        let v = if raw.is_nan() {
            // only reachable through inf − inf on saturated inputs
            clamped += 1;
            xi
        } else if !(0.0..=MAX_INTENSITY).contains(&raw) {
            clamped += 1;
            raw.clamp(0.0, MAX_INTENSITY)
        } else {
            raw
        };
        max_abs_change = max_abs_change.max((v - xi).abs());
        next.data[i] = v;
    }
    (max_abs_change, clamped)
}

/// Smoothness energy restricted to the free pixels.
pub(crate) fn energy(img: &ImageF32, free: &[usize]) -> f64 {
    let mut e = 0.0f64;
    for &i in free {
        let xi = img.data[i] as f64;
        for_each_neighbor(i, img.w, img.h, |j| {
            let d = xi - img.data[j] as f64;
            e += d * d;
        });
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> ImageF32 {
        let data = (0..w * h).map(|i| ((i * 37) % 256) as f32).collect();
        ImageF32::from_vec(w, h, data).unwrap()
    }

    #[test]
    fn corner_and_edge_pixels_have_fewer_neighbors() {
        let count = |idx: usize| {
            let mut n = 0;
            for_each_neighbor(idx, 3, 3, |_| n += 1);
            n
        };
        assert_eq!(count(0), 2);
        assert_eq!(count(1), 3);
        assert_eq!(count(4), 4);
        assert_eq!(count(8), 2);
    }

    #[test]
    fn single_row_image_has_horizontal_neighbors_only() {
        let mut seen = Vec::new();
        for_each_neighbor(2, 5, 1, |j| seen.push(j));
        assert_eq!(seen, vec![1, 3]);
    }

    #[test]
    fn step_is_independent_of_visit_order() {
        let current = ramp(7, 5);
        let free: Vec<usize> = (0..35).filter(|i| i % 3 != 0).collect();
        let mut reversed = free.clone();
        reversed.reverse();

        let mut a = current.clone();
        let mut b = current.clone();
        let stats_a = jacobi_step(&current, &mut a, &free, 0.2);
        let stats_b = jacobi_step(&current, &mut b, &reversed, 0.2);
        assert_eq!(a, b);
        assert_eq!(stats_a, stats_b);
    }

    #[test]
    fn huge_step_clamps_to_valid_range() {
        let current = ramp(6, 6);
        let free: Vec<usize> = (0..36).collect();
        let mut next = current.clone();
        let (_, clamped) = jacobi_step(&current, &mut next, &free, 1e6);
        assert!(clamped > 0);
        assert!(next.is_valid_intensity());
    }

    #[test]
    fn step_at_stability_bound_never_clamps() {
        // At eta = 1 / max degree each update is a convex combination of the
        // pixel and its neighbors, so values stay inside the input range.
        let current = ramp(9, 7);
        let free: Vec<usize> = (0..63).filter(|i| i % 4 != 0).collect();
        let mut next = current.clone();
        let (_, clamped) = jacobi_step(&current, &mut next, &free, STABLE_ETA_LIMIT);
        assert_eq!(clamped, 0);
        let (lo, hi) = current
            .data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        assert!(next.data.iter().all(|&v| v >= lo && v <= hi));
    }

    #[test]
    fn energy_of_flat_image_is_zero() {
        let flat = ImageF32::filled(4, 4, 12.0);
        let free: Vec<usize> = (0..16).collect();
        assert_eq!(energy(&flat, &free), 0.0);
    }

    #[test]
    fn energy_counts_each_free_pixel_edges() {
        // [0, 10] with only the right pixel free: one edge, (10 − 0)².
        let img = ImageF32::from_vec(2, 1, vec![0.0, 10.0]).unwrap();
        assert_eq!(energy(&img, &[1]), 100.0);
        assert_eq!(energy(&img, &[0, 1]), 200.0);
    }
}
