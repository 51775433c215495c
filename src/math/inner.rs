//! Noise-weighted inner product and tolerant grid lookup.
//!
//! The inner product of two frequency series `a`, `b` with one-sided PSD `S`
//! over an observation of duration `T` is
//!
//! ```text
//! (a | b) = 4/T * Σ conj(a_k) * b_k / S_k
//! ```
//!
//! It is conjugate-antisymmetric: `(a | b) = conj((b | a))`.

use num_complex::Complex64;

/// Relative tolerance used when matching a target frequency to a grid sample.
pub const GRID_RTOL: f64 = 1e-9;

/// Noise-weighted inner product over the samples of `a`, `b` and `psd`.
///
/// # Panics
/// Panics if the three slices differ in length. Callers slice them from the
/// same bin range.
pub fn noise_weighted_inner_product(
    a: &[Complex64],
    b: &[Complex64],
    psd: &[f64],
    duration: f64,
) -> Complex64 {
    assert_eq!(a.len(), b.len(), "inner product operands differ in length");
    assert_eq!(a.len(), psd.len(), "inner product PSD differs in length");

    let sum: Complex64 = a
        .iter()
        .zip(b.iter())
        .zip(psd.iter())
        .map(|((x, y), &s)| x.conj() * y / s)
        .sum();
    sum * (4.0 / duration)
}

/// Index of the first grid sample at or above `target`.
///
/// Samples within `GRID_RTOL` (relative) below the target count as a match,
/// so a frequency read back from the same grid is never missed through
/// rounding. Returns `None` if every sample lies below the target.
pub fn index_at_or_above(grid: &[f64], target: f64) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }
    let tol = GRID_RTOL * target.abs().max(1.0);
    let idx = grid.partition_point(|&f| f < target - tol);
    (idx < grid.len()).then_some(idx)
}
