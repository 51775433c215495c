//! Composition of per-detector SNR quantities into likelihoods.
//!
//! The relative-binning core only supplies `CalculatedSnrs`; how they turn
//! into a log-likelihood ratio (with or without marginalization) is decided
//! here. [`GaussianLikelihood`] is the plain stationary-Gaussian-noise case.

use crate::detector::Interferometer;
use crate::domain::CalculatedSnrs;
use crate::error::{RelBinError, Result};
use crate::math::noise_weighted_inner_product;

pub trait BaseLikelihood: Send + Sync {
    /// Log-likelihood of the data under the noise-only hypothesis.
    fn noise_log_likelihood(&self, detectors: &[Interferometer]) -> Result<f64>;

    /// Log-likelihood ratio of signal vs noise for one candidate.
    fn log_likelihood_ratio(&self, snrs: &[CalculatedSnrs]) -> Result<f64>;
}

/// `ln L_noise = -½ Σ (d|d)` and `ln Λ = Σ Re(d|h) - ½ (h|h)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianLikelihood;

impl BaseLikelihood for GaussianLikelihood {
    fn noise_log_likelihood(&self, detectors: &[Interferometer]) -> Result<f64> {
        let mut total = 0.0;
        for detector in detectors {
            let band = detector.masked_range()?;
            let strain = &detector.strain().as_slice()[band.clone()];
            let psd = &detector.power_spectral_density()[band];
            total -= 0.5
                * noise_weighted_inner_product(strain, strain, psd, detector.duration()).re;
        }
        Ok(total)
    }

    fn log_likelihood_ratio(&self, snrs: &[CalculatedSnrs]) -> Result<f64> {
        let value: f64 = snrs
            .iter()
            .map(|s| s.d_inner_h.re - 0.5 * s.optimal_snr_squared)
            .sum();
        if value.is_finite() {
            Ok(value)
        } else {
            Err(RelBinError::computation(format!(
                "Non-finite log-likelihood ratio ({value})."
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::FixedAntenna;
    use crate::domain::ComplexSeries;
    use num_complex::Complex64;

    #[test]
    fn ratio_sums_detectors() {
        let snrs = vec![
            CalculatedSnrs {
                d_inner_h: Complex64::new(10.0, 3.0),
                optimal_snr_squared: 8.0,
                complex_matched_filter_snr: Complex64::new(0.0, 0.0),
                d_inner_h_array: None,
            },
            CalculatedSnrs {
                d_inner_h: Complex64::new(4.0, -1.0),
                optimal_snr_squared: 6.0,
                complex_matched_filter_snr: Complex64::new(0.0, 0.0),
                d_inner_h_array: None,
            },
        ];
        let llr = GaussianLikelihood.log_likelihood_ratio(&snrs).unwrap();
        assert!((llr - (10.0 - 4.0 + 4.0 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn noise_likelihood_only_counts_the_band() {
        let f: Vec<f64> = (0..10).map(|k| k as f64).collect();
        let mut det = Interferometer::new(
            "H1",
            f,
            vec![1.0; 10],
            2.0,
            2.0,
            5.0,
            Box::new(FixedAntenna::new(1.0, 0.0, 0.0)),
        )
        .unwrap();
        det.set_strain(ComplexSeries::from_vec(vec![Complex64::new(1.0, 1.0); 10]))
            .unwrap();
        // Four samples in band, |d|² = 2, 4/T = 2: (d|d) = 16.
        let ll = GaussianLikelihood.noise_log_likelihood(&[det]).unwrap();
        assert!((ll + 8.0).abs() < 1e-12);
    }
}
