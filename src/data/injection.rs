//! Signal injection into detector strain.
//!
//! Noise is stationary Gaussian, coloured by each detector's PSD: the real
//! and imaginary parts of every sample are independent with variance
//! `S(f) T / 4`, so `E[(n|n)] = 2` per sample under the crate's inner product.

use num_complex::Complex64;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::detector::Interferometer;
use crate::domain::{ComplexSeries, Parameters};
use crate::error::Result;
use crate::models::{Evaluation, WaveformModel};

/// Draw one noise realization for `detector`.
pub fn gaussian_noise(detector: &Interferometer, rng: &mut StdRng) -> ComplexSeries {
    let scale = detector.duration() / 4.0;
    let psd = detector.power_spectral_density();
    ComplexSeries::from_iterator(
        psd.len(),
        psd.iter().map(|&s| {
            // Out-of-band samples may carry a zero or undefined PSD.
            if !(s.is_finite() && s > 0.0) {
                return Complex64::new(0.0, 0.0);
            }
            let sigma = (s * scale).sqrt();
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            Complex64::new(sigma * re, sigma * im)
        }),
    )
}

/// Replace every detector's strain with the projected signal for
/// `parameters`, plus seeded noise when `noise_seed` is given.
///
/// A single RNG is drawn from in detector order, so a seed fixes the whole
/// network's noise.
pub fn inject_signal(
    detectors: &mut [Interferometer],
    model: &dyn WaveformModel,
    parameters: &Parameters,
    noise_seed: Option<u64>,
) -> Result<()> {
    let polarizations = model.evaluate(parameters, model.frequency_array(), Evaluation::Fiducial)?;
    let mut rng = noise_seed.map(StdRng::seed_from_u64);

    for detector in detectors.iter_mut() {
        let mut strain = detector.get_detector_response(&polarizations, parameters, None)?;
        if let Some(rng) = rng.as_mut() {
            strain += gaussian_noise(detector, rng);
        }
        detector.set_strain(strain)?;
    }
    Ok(())
}
