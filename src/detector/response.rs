//! Projection of polarizations onto a detector.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::domain::{ComplexSeries, Parameters};
use crate::error::{RelBinError, Result};
use crate::models::Polarizations;

/// Detector response to a set of polarizations.
///
/// `frequencies` is the grid the polarizations are aligned with; the output
/// has the same length.
pub trait DetectorResponse: Send + Sync + std::fmt::Debug {
    fn project(
        &self,
        polarizations: &Polarizations,
        parameters: &Parameters,
        frequencies: &[f64],
    ) -> Result<ComplexSeries>;
}

/// Time-independent antenna pattern with a fixed arrival delay.
///
/// `h(f) = (F+ h+(f) + F× h×(f)) e^{-2πi f Δt}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAntenna {
    pub f_plus: f64,
    pub f_cross: f64,
    /// Arrival delay relative to the geocenter (s).
    pub time_delay: f64,
}

impl FixedAntenna {
    pub fn new(f_plus: f64, f_cross: f64, time_delay: f64) -> Self {
        Self {
            f_plus,
            f_cross,
            time_delay,
        }
    }
}

impl DetectorResponse for FixedAntenna {
    fn project(
        &self,
        polarizations: &Polarizations,
        _parameters: &Parameters,
        frequencies: &[f64],
    ) -> Result<ComplexSeries> {
        let plus = polarizations.mode(Polarizations::PLUS)?;
        let cross = polarizations.mode(Polarizations::CROSS)?;
        if plus.len() != frequencies.len() {
            return Err(RelBinError::computation(format!(
                "Polarizations have {} samples but {} frequencies were requested.",
                plus.len(),
                frequencies.len()
            )));
        }

        Ok(ComplexSeries::from_iterator(
            frequencies.len(),
            frequencies.iter().enumerate().map(|(k, &f)| {
                let shift = Complex64::from_polar(1.0, -2.0 * PI * f * self.time_delay);
                (plus[k] * self.f_plus + cross[k] * self.f_cross) * shift
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_is_a_linear_combination() {
        let plus = ComplexSeries::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 2.0)]);
        let cross = ComplexSeries::from_vec(vec![Complex64::new(0.5, 0.5), Complex64::new(1.0, 0.0)]);
        let pol = Polarizations::new(plus, cross).unwrap();
        let antenna = FixedAntenna::new(0.6, -0.2, 0.0);
        let h = antenna
            .project(&pol, &Parameters::new(), &[10.0, 20.0])
            .unwrap();
        assert!((h[0] - Complex64::new(0.5, -0.1)).norm() < 1e-12);
        assert!((h[1] - Complex64::new(-0.2, 1.2)).norm() < 1e-12);
    }

    #[test]
    fn delay_only_rotates_phase() {
        let plus = ComplexSeries::from_vec(vec![Complex64::new(1.0, 0.0); 3]);
        let cross = ComplexSeries::zeros(3);
        let pol = Polarizations::new(plus, cross).unwrap();
        let antenna = FixedAntenna::new(1.0, 0.0, 0.0123);
        let h = antenna
            .project(&pol, &Parameters::new(), &[15.0, 40.0, 90.0])
            .unwrap();
        for v in h.iter() {
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
    }
}
