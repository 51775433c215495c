//! Leading-order (Newtonian) stationary-phase inspiral.
//!
//! ```text
//! Ψ(f) = 2π f t_c - φ_c - π/4 + (3/128) (π M_c f)^{-5/3}
//! h(f) = A M_c^{5/6} f^{-7/6} e^{-iΨ(f)}            for 0 < f <= f_isco
//! h+   = h (1 + cos²ι) / 2
//! h×   = -i h cos ι
//! ```
//!
//! `M_c` is the chirp mass in seconds and `f_isco` the innermost stable
//! circular orbit frequency of the total mass. The model is smooth in every
//! parameter below `f_isco`, which makes it a good test bed for the binning
//! scheme.
//!
//! Parameters: `chirp_mass` (solar masses), `mass_ratio` (0 < q <= 1),
//! `amplitude`, `phase`, `geocent_time` (s), `theta_jn` (rad).

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::domain::{ComplexSeries, Parameters};
use crate::error::{RelBinError, Result};
use crate::models::model::{require, Evaluation, Polarizations, WaveformModel};

/// G M_sun / c^3 in seconds.
pub const SOLAR_MASS_SECONDS: f64 = 4.925_491_025_543_576e-6;

/// Uniform frequency grid `k / duration` for `k = 0..n_samples`.
pub fn frequency_grid(duration: f64, n_samples: usize) -> Vec<f64> {
    (0..n_samples).map(|k| k as f64 / duration).collect()
}

#[derive(Debug, Clone)]
pub struct NewtonianChirp {
    frequency_array: Vec<f64>,
    duration: f64,
}

impl NewtonianChirp {
    pub fn new(frequency_array: Vec<f64>, duration: f64) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(RelBinError::config(format!(
                "Duration must be finite and > 0 (got {duration})."
            )));
        }
        if frequency_array.is_empty() {
            return Err(RelBinError::config("Frequency grid is empty."));
        }
        Ok(Self {
            frequency_array,
            duration,
        })
    }

    /// Model on the uniform grid implied by `duration` and `n_samples`.
    pub fn with_uniform_grid(duration: f64, n_samples: usize) -> Result<Self> {
        Self::new(frequency_grid(duration, n_samples), duration)
    }
}

/// Innermost-stable-circular-orbit frequency (Hz) for the given masses.
pub fn isco_frequency(chirp_mass: f64, mass_ratio: f64) -> f64 {
    let eta = mass_ratio / (1.0 + mass_ratio).powi(2);
    let total_mass = chirp_mass * eta.powf(-0.6);
    1.0 / (6.0_f64.powf(1.5) * PI * total_mass * SOLAR_MASS_SECONDS)
}

impl WaveformModel for NewtonianChirp {
    fn frequency_array(&self) -> &[f64] {
        &self.frequency_array
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    // The model has no marginalizable toggles, so both evaluation kinds agree.
    fn evaluate(
        &self,
        parameters: &Parameters,
        frequencies: &[f64],
        _evaluation: Evaluation,
    ) -> Result<Polarizations> {
        let chirp_mass = require(parameters, "chirp_mass")?;
        let mass_ratio = require(parameters, "mass_ratio")?;
        let amplitude = require(parameters, "amplitude")?;
        let phase = require(parameters, "phase")?;
        let t_c = require(parameters, "geocent_time")?;
        let theta_jn = require(parameters, "theta_jn")?;

        if !(chirp_mass.is_finite() && chirp_mass > 0.0) {
            return Err(RelBinError::config(format!(
                "chirp_mass must be > 0 (got {chirp_mass})."
            )));
        }
        if !(mass_ratio.is_finite() && mass_ratio > 0.0 && mass_ratio <= 1.0) {
            return Err(RelBinError::config(format!(
                "mass_ratio must lie in (0, 1] (got {mass_ratio})."
            )));
        }

        let f_isco = isco_frequency(chirp_mass, mass_ratio);
        let mc_s = chirp_mass * SOLAR_MASS_SECONDS;
        let scale = amplitude * chirp_mass.powf(5.0 / 6.0);
        let cos_i = theta_jn.cos();
        let plus_factor = 0.5 * (1.0 + cos_i * cos_i);
        let cross_factor = Complex64::new(0.0, -cos_i);

        let n = frequencies.len();
        let mut plus = ComplexSeries::zeros(n);
        let mut cross = ComplexSeries::zeros(n);
        for (k, &f) in frequencies.iter().enumerate() {
            if f <= 0.0 || f > f_isco {
                continue;
            }
            let psi = 2.0 * PI * f * t_c - phase - PI / 4.0
                + 3.0 / 128.0 * (PI * mc_s * f).powf(-5.0 / 3.0);
            let h = Complex64::from_polar(scale * f.powf(-7.0 / 6.0), -psi);
            plus[k] = h * plus_factor;
            cross[k] = h * cross_factor;
        }

        Polarizations::new(plus, cross)
    }
}
