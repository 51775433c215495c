//! Post-Newtonian phase-deviation curve used to place bin edges.
//!
//! The frequency-domain phase of an inspiral is modelled as a sum of power
//! laws `α_k f^γ_k`. For each exponent we bound how far `α_k` may move so that
//! the term changes by at most `2π χ` over the band `[f_min, f_max]`:
//!
//! - `γ < 0`: the term is largest at `f_min`, so `δα = 2πχ / f_min^γ`
//! - `γ > 0`: the term is largest at `f_max`, so `δα = 2πχ / f_max^γ`
//!
//! Summing `sign(γ) δα f^γ` gives a curve that is non-decreasing in `f`
//! (every term is increasing), which we anchor to zero at the first sample.

use std::f64::consts::PI;

/// Representative post-Newtonian phase exponents.
pub const PN_EXPONENTS: [f64; 5] = [-5.0 / 3.0, -2.0 / 3.0, 1.0, 5.0 / 3.0, 7.0 / 3.0];

/// Per-exponent coefficient perturbation bounds for the band `[f_min, f_max]`.
pub fn coefficient_bounds(f_min: f64, f_max: f64, chi: f64) -> [f64; 5] {
    PN_EXPONENTS.map(|gamma| {
        let reference = if gamma < 0.0 {
            f_min.powf(gamma)
        } else {
            f_max.powf(gamma)
        };
        chi * 2.0 * PI / reference.abs()
    })
}

/// Cumulative phase deviation over `frequencies`, zero at the first sample.
///
/// `frequencies` should already be restricted to `[f_min, f_max]`.
pub fn phase_deviation(frequencies: &[f64], f_min: f64, f_max: f64, chi: f64) -> Vec<f64> {
    let d_alpha = coefficient_bounds(f_min, f_max, chi);
    let d_phi = |f: f64| -> f64 {
        PN_EXPONENTS
            .iter()
            .zip(d_alpha.iter())
            .map(|(&gamma, &da)| gamma.signum() * da * f.powf(gamma))
            .sum()
    };

    let Some(&f0) = frequencies.first() else {
        return Vec::new();
    };
    let start = d_phi(f0);
    frequencies.iter().map(|&f| d_phi(f) - start).collect()
}
