//! Fiducial waveform management.
//!
//! The fiducial waveform is the expansion point of the relative-binning
//! approximation. It is kept per detector at full resolution and, once bins
//! exist, sampled at each detector's bin edges (the denominators of every
//! waveform ratio).

use log::info;

use crate::detector::Interferometer;
use crate::domain::{BinSet, ComplexSeries, Parameters};
use crate::error::{RelBinError, Result};
use crate::models::{Evaluation, Polarizations, WaveformModel};

#[derive(Debug, Clone)]
pub struct FiducialWaveforms {
    parameters: Parameters,
    /// Ordered like the detector list.
    per_detector: Vec<ComplexSeries>,
    /// Fiducial waveform at each detector's bin edges; empty before bins exist.
    per_detector_points: Vec<ComplexSeries>,
}

/// Fiducial polarizations on the model grid, with the frequency of their last
/// nonzero sample.
pub fn evaluate_fiducial(
    model: &dyn WaveformModel,
    parameters: &Parameters,
) -> Result<(Polarizations, f64)> {
    let frequency_array = model.frequency_array();
    let polarizations = model.evaluate(parameters, frequency_array, Evaluation::Fiducial)?;
    if polarizations.len() != frequency_array.len() {
        return Err(RelBinError::computation(format!(
            "Fiducial polarizations have {} samples, model grid has {}.",
            polarizations.len(),
            frequency_array.len()
        )));
    }

    let max_index = polarizations
        .max_nonzero_index()
        .ok_or_else(|| RelBinError::DegenerateFiducial(format!("{parameters:?}")))?;
    let cutoff = frequency_array[max_index];
    info!("Maximum nonzero index is {max_index}");
    info!("Maximum nonzero frequency is {cutoff} Hz");
    Ok((polarizations, cutoff))
}

/// Lower every detector's maximum frequency to `cutoff` where it lies above.
pub fn clip_detectors(detectors: &mut [Interferometer], cutoff: f64) {
    for detector in detectors.iter_mut() {
        let previous = detector.maximum_frequency();
        if detector.clip_maximum_frequency(cutoff) {
            info!(
                "Clipped maximum frequency of {} from {} Hz to {} Hz",
                detector.name(),
                previous,
                cutoff
            );
        }
    }
}

impl FiducialWaveforms {
    /// Evaluate the fiducial polarizations, clip every detector's maximum
    /// frequency to the last nonzero sample, and project onto each detector.
    pub fn build(
        model: &dyn WaveformModel,
        detectors: &mut [Interferometer],
        parameters: Parameters,
    ) -> Result<Self> {
        let (polarizations, cutoff) = evaluate_fiducial(model, &parameters)?;
        clip_detectors(detectors, cutoff);
        Self::project(detectors, parameters, &polarizations)
    }

    /// Project already evaluated fiducial polarizations onto each detector.
    /// Detector bands are left untouched.
    pub fn project(
        detectors: &[Interferometer],
        parameters: Parameters,
        polarizations: &Polarizations,
    ) -> Result<Self> {
        let per_detector = detectors
            .iter()
            .map(|detector| {
                let waveform = detector.get_detector_response(polarizations, &parameters, None)?;
                if waveform.len() != detector.frequency_array().len() {
                    return Err(RelBinError::computation(format!(
                        "{}: fiducial response has {} samples, grid has {}.",
                        detector.name(),
                        waveform.len(),
                        detector.frequency_array().len()
                    )));
                }
                Ok(waveform)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            parameters,
            per_detector,
            per_detector_points: Vec::new(),
        })
    }

    /// Sample each detector's fiducial waveform at its bin edges.
    pub fn sample_at_edges(&mut self, bins: &[BinSet]) -> Result<()> {
        if bins.len() != self.per_detector.len() {
            return Err(RelBinError::computation(format!(
                "{} bin sets for {} detectors.",
                bins.len(),
                self.per_detector.len()
            )));
        }
        self.per_detector_points = self
            .per_detector
            .iter()
            .zip(bins.iter())
            .map(|(waveform, bin_set)| {
                if bin_set.indices.iter().any(|&i| i >= waveform.len()) {
                    return Err(RelBinError::computation(
                        "Bin edge index outside the fiducial waveform.",
                    ));
                }
                Ok(ComplexSeries::from_iterator(
                    bin_set.indices.len(),
                    bin_set.indices.iter().map(|&i| waveform[i]),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Full-resolution fiducial waveform of detector `index`.
    pub fn waveform(&self, index: usize) -> &ComplexSeries {
        &self.per_detector[index]
    }

    /// Fiducial waveform of detector `index` at its bin edges.
    pub fn edge_samples(&self, index: usize) -> Result<&ComplexSeries> {
        self.per_detector_points.get(index).ok_or_else(|| {
            RelBinError::computation("Fiducial waveform has not been sampled at bin edges yet.")
        })
    }
}
