//! Waveform-model interface and polarization container.
//!
//! Bin edges reach the model as an explicit `frequencies` argument on every
//! call, so one model instance can serve several detectors with different bin
//! plans, including from parallel evaluations.

use std::collections::BTreeMap;

use num_complex::Complex64;

use crate::domain::{ComplexSeries, Parameters};
use crate::error::{RelBinError, Result};

/// Why the model is being evaluated.
///
/// Models with marginalizable toggles (e.g. a phase that is integrated out
/// downstream) must disable them for `Fiducial` evaluations so the reference
/// waveform is the full signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Fiducial,
    Candidate,
}

/// Frequency-domain polarizations keyed by mode name (`plus`, `cross`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Polarizations {
    modes: BTreeMap<String, ComplexSeries>,
}

impl Polarizations {
    pub const PLUS: &'static str = "plus";
    pub const CROSS: &'static str = "cross";

    pub fn new(plus: ComplexSeries, cross: ComplexSeries) -> Result<Self> {
        let mut modes = BTreeMap::new();
        modes.insert(Self::PLUS.to_string(), plus);
        modes.insert(Self::CROSS.to_string(), cross);
        Self::from_modes(modes)
    }

    pub fn from_modes(modes: BTreeMap<String, ComplexSeries>) -> Result<Self> {
        let mut lengths = modes.values().map(|m| m.len());
        if let Some(first) = lengths.next() {
            if lengths.any(|len| len != first) {
                return Err(RelBinError::computation(
                    "Polarization modes have different lengths.",
                ));
            }
        }
        Ok(Self { modes })
    }

    pub fn get(&self, mode: &str) -> Option<&ComplexSeries> {
        self.modes.get(mode)
    }

    /// Look up a mode, failing if the model did not produce it.
    pub fn mode(&self, mode: &str) -> Result<&ComplexSeries> {
        self.get(mode)
            .ok_or_else(|| RelBinError::computation(format!("Missing polarization mode '{mode}'.")))
    }

    /// Number of frequency samples per mode.
    pub fn len(&self) -> usize {
        self.modes.values().next().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest sample index at which any mode is nonzero.
    pub fn max_nonzero_index(&self) -> Option<usize> {
        let zero = Complex64::new(0.0, 0.0);
        self.modes
            .values()
            .filter_map(|m| m.iter().rposition(|v| *v != zero))
            .max()
    }
}

/// Source of frequency-domain polarizations.
pub trait WaveformModel: Send + Sync {
    /// Full frequency grid the model is defined on (Hz).
    fn frequency_array(&self) -> &[f64];

    /// Observation duration (s).
    fn duration(&self) -> f64;

    /// Evaluate the polarizations at `frequencies`.
    ///
    /// The returned modes are aligned with `frequencies`, which is either the
    /// full grid or a detector's bin edges.
    fn evaluate(
        &self,
        parameters: &Parameters,
        frequencies: &[f64],
        evaluation: Evaluation,
    ) -> Result<Polarizations>;
}

/// Fetch a required parameter.
pub fn require(parameters: &Parameters, name: &str) -> Result<f64> {
    parameters
        .get(name)
        .copied()
        .ok_or_else(|| RelBinError::config(format!("Missing parameter '{name}'.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_nonzero_index_spans_all_modes() {
        let z = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let plus = ComplexSeries::from_vec(vec![one, one, z, z]);
        let cross = ComplexSeries::from_vec(vec![z, one, one, z]);
        let pol = Polarizations::new(plus, cross).unwrap();
        assert_eq!(pol.max_nonzero_index(), Some(2));

        let zeros = Polarizations::new(ComplexSeries::zeros(4), ComplexSeries::zeros(4)).unwrap();
        assert_eq!(zeros.max_nonzero_index(), None);
    }

    #[test]
    fn mismatched_mode_lengths_are_rejected() {
        let err = Polarizations::new(ComplexSeries::zeros(3), ComplexSeries::zeros(4));
        assert!(err.is_err());
    }
}
