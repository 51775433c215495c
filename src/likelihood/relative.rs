//! Relative-binning likelihood orchestration.
//!
//! Construction order:
//!
//! 1. fiducial waveforms (clipping each detector's band to the signal support)
//! 2. bin plan per detector, from the clipped band
//! 3. fiducial samples at the bin edges
//! 4. summary data
//!
//! Per-detector state is kept in vectors ordered like the detector list.
//! After construction only [`RelativeBinningLikelihood::set_fiducial_parameters`]
//! mutates it; bins are never re-planned.

use log::info;
use rayon::prelude::*;

use crate::binning::BinPlanner;
use crate::detector::Interferometer;
use crate::domain::{
    BinSet, CalculatedSnrs, ComplexSeries, Parameters, RelativeBinningConfig, SummaryData,
    WaveformRatio,
};
use crate::error::{RelBinError, Result};
use crate::likelihood::base::{BaseLikelihood, GaussianLikelihood};
use crate::likelihood::fiducial::{clip_detectors, evaluate_fiducial, FiducialWaveforms};
use crate::likelihood::ratio::{compute_waveform_ratio, reconstruct_full_waveform};
use crate::likelihood::snr::{binned_overlaps, d_inner_h_time_series};
use crate::likelihood::summary::compile_summary_data;
use crate::math::GRID_RTOL;
use crate::models::{Evaluation, Polarizations, WaveformModel};

pub struct RelativeBinningLikelihood {
    detectors: Vec<Interferometer>,
    model: Box<dyn WaveformModel>,
    base: Box<dyn BaseLikelihood>,
    config: RelativeBinningConfig,
    fiducial: FiducialWaveforms,
    bins: Vec<BinSet>,
    summary: Vec<SummaryData>,
}

impl std::fmt::Debug for RelativeBinningLikelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelativeBinningLikelihood")
            .field(
                "detectors",
                &self.detectors.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .field("fiducial_parameters", self.fiducial.parameters())
            .field("bins", &self.bins.iter().map(|b| b.len()).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl RelativeBinningLikelihood {
    /// Build with the stationary-Gaussian base likelihood.
    pub fn new(
        detectors: Vec<Interferometer>,
        model: Box<dyn WaveformModel>,
        fiducial_parameters: Parameters,
        config: RelativeBinningConfig,
    ) -> Result<Self> {
        Self::with_base_likelihood(
            detectors,
            model,
            fiducial_parameters,
            config,
            Box::new(GaussianLikelihood),
        )
    }

    pub fn with_base_likelihood(
        mut detectors: Vec<Interferometer>,
        model: Box<dyn WaveformModel>,
        fiducial_parameters: Parameters,
        config: RelativeBinningConfig,
        base: Box<dyn BaseLikelihood>,
    ) -> Result<Self> {
        config.validate()?;
        if detectors.is_empty() {
            return Err(RelBinError::config("At least one detector is required."));
        }
        for detector in &detectors {
            check_grid(detector, model.as_ref())?;
        }
        let planner = BinPlanner::new(config.chi, config.epsilon)?;

        let mut fiducial =
            FiducialWaveforms::build(model.as_ref(), &mut detectors, fiducial_parameters)?;
        info!("Initial fiducial waveforms set up");

        let bins = detectors
            .iter()
            .map(|d| {
                planner.plan(
                    d.name(),
                    model.frequency_array(),
                    d.minimum_frequency(),
                    d.maximum_frequency(),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        fiducial.sample_at_edges(&bins)?;

        let summary = compile_all(&detectors, &fiducial, &bins)?;
        info!("Summary data obtained");

        Ok(Self {
            detectors,
            model,
            base,
            config,
            fiducial,
            bins,
            summary,
        })
    }

    pub fn config(&self) -> &RelativeBinningConfig {
        &self.config
    }

    pub fn detectors(&self) -> &[Interferometer] {
        &self.detectors
    }

    pub fn model(&self) -> &dyn WaveformModel {
        self.model.as_ref()
    }

    pub fn fiducial_parameters(&self) -> &Parameters {
        self.fiducial.parameters()
    }

    pub fn fiducial(&self) -> &FiducialWaveforms {
        &self.fiducial
    }

    pub fn bins(&self) -> &[BinSet] {
        &self.bins
    }

    pub fn summary_data(&self) -> &[SummaryData] {
        &self.summary
    }

    /// Position of the detector called `name`.
    pub fn detector_index(&self, name: &str) -> Result<usize> {
        self.detectors
            .iter()
            .position(|d| d.name() == name)
            .ok_or_else(|| RelBinError::config(format!("Unknown detector '{name}'.")))
    }

    /// Replace the fiducial point and recompute everything that depends on it.
    ///
    /// Bin edges are kept from construction. A fiducial whose support ends
    /// below some detector's last bin edge is rejected with
    /// [`RelBinError::GridLookup`]; on any error the detector bands, fiducial
    /// waveforms and summary data are left as they were.
    pub fn set_fiducial_parameters(&mut self, parameters: Parameters) -> Result<()> {
        let (polarizations, cutoff) = evaluate_fiducial(self.model.as_ref(), &parameters)?;
        for (detector, bins) in self.detectors.iter().zip(&self.bins) {
            let last_edge = bins.last_edge();
            if cutoff < last_edge - GRID_RTOL * last_edge.abs().max(1.0) {
                return Err(RelBinError::GridLookup {
                    detector: detector.name().to_string(),
                    frequency: last_edge,
                });
            }
        }

        let mut fiducial = FiducialWaveforms::project(&self.detectors, parameters, &polarizations)?;
        fiducial.sample_at_edges(&self.bins)?;

        let previous: Vec<f64> = self.detectors.iter().map(|d| d.maximum_frequency()).collect();
        clip_detectors(&mut self.detectors, cutoff);
        let summary = match compile_all(&self.detectors, &fiducial, &self.bins) {
            Ok(summary) => summary,
            Err(err) => {
                for (detector, maximum) in self.detectors.iter_mut().zip(previous) {
                    detector.set_maximum_frequency(maximum);
                }
                return Err(err);
            }
        };

        self.fiducial = fiducial;
        self.summary = summary;
        info!("Fiducial waveforms updated");
        info!("Summary data updated");
        Ok(())
    }

    /// Candidate polarizations at detector `index`'s bin edges.
    pub fn evaluate_at_edges(&self, parameters: &Parameters, index: usize) -> Result<Polarizations> {
        let bins = self.bin_set(index)?;
        self.model
            .evaluate(parameters, &bins.edges, Evaluation::Candidate)
    }

    /// `(r0, r1)` for polarizations aligned with detector `index`'s bin edges.
    pub fn compute_waveform_ratio(
        &self,
        polarizations: &Polarizations,
        parameters: &Parameters,
        index: usize,
    ) -> Result<WaveformRatio> {
        let bins = self.bin_set(index)?;
        let detector = &self.detectors[index];
        let strain = detector.get_detector_response(polarizations, parameters, Some(&bins.edges))?;
        compute_waveform_ratio(
            detector.name(),
            &strain,
            self.fiducial.edge_samples(index)?,
            bins,
        )
    }

    /// Full-resolution approximation of the candidate at detector `index`.
    pub fn compute_full_waveform(
        &self,
        polarizations: &Polarizations,
        parameters: &Parameters,
        index: usize,
    ) -> Result<ComplexSeries> {
        let ratio = self.compute_waveform_ratio(polarizations, parameters, index)?;
        self.full_waveform_from_ratio(&ratio, index)
    }

    fn full_waveform_from_ratio(&self, ratio: &WaveformRatio, index: usize) -> Result<ComplexSeries> {
        reconstruct_full_waveform(
            self.fiducial.waveform(index),
            self.detectors[index].frequency_array(),
            ratio,
            &self.bins[index],
        )
    }

    /// SNR quantities for candidate polarizations at detector `index`.
    pub fn calculate_snrs(
        &self,
        polarizations: &Polarizations,
        parameters: &Parameters,
        index: usize,
    ) -> Result<CalculatedSnrs> {
        let ratio = self.compute_waveform_ratio(polarizations, parameters, index)?;
        let overlaps = binned_overlaps(&self.summary[index], &ratio)?;

        let d_inner_h_array = if self.config.time_marginalization {
            let full = self.full_waveform_from_ratio(&ratio, index)?;
            Some(d_inner_h_time_series(&self.detectors[index], &full)?)
        } else {
            None
        };

        Ok(CalculatedSnrs {
            d_inner_h: overlaps.d_inner_h,
            optimal_snr_squared: overlaps.optimal_snr_squared,
            complex_matched_filter_snr: overlaps.complex_matched_filter_snr,
            d_inner_h_array,
        })
    }

    /// SNR quantities for every detector, evaluated in parallel.
    pub fn detector_snrs(&self, parameters: &Parameters) -> Result<Vec<CalculatedSnrs>> {
        (0..self.detectors.len())
            .into_par_iter()
            .map(|index| {
                let polarizations = self.evaluate_at_edges(parameters, index)?;
                self.calculate_snrs(&polarizations, parameters, index)
            })
            .collect()
    }

    /// `ln Λ` for `parameters`, summed over detectors.
    ///
    /// A candidate with no power in some detector's bins (for example zero
    /// amplitude) has `(h|h) = 0` there and gives a
    /// [`RelBinError::Computation`] error rather than `0`.
    pub fn log_likelihood_ratio(&self, parameters: &Parameters) -> Result<f64> {
        let snrs = self.detector_snrs(parameters)?;
        self.base.log_likelihood_ratio(&snrs)
    }

    pub fn noise_log_likelihood(&self) -> Result<f64> {
        self.base.noise_log_likelihood(&self.detectors)
    }

    pub fn log_likelihood(&self, parameters: &Parameters) -> Result<f64> {
        Ok(self.log_likelihood_ratio(parameters)? + self.noise_log_likelihood()?)
    }

    fn bin_set(&self, index: usize) -> Result<&BinSet> {
        self.bins
            .get(index)
            .ok_or_else(|| RelBinError::config(format!("No detector at position {index}.")))
    }
}

fn compile_all(
    detectors: &[Interferometer],
    fiducial: &FiducialWaveforms,
    bins: &[BinSet],
) -> Result<Vec<SummaryData>> {
    detectors
        .par_iter()
        .enumerate()
        .map(|(i, detector)| compile_summary_data(detector, fiducial.waveform(i), &bins[i]))
        .collect()
}

/// Detector and model must share one frequency grid: bin indices are planned
/// on the model grid and used on the detector grid.
fn check_grid(detector: &Interferometer, model: &dyn WaveformModel) -> Result<()> {
    let ours = detector.frequency_array();
    let theirs = model.frequency_array();
    let matches = ours.len() == theirs.len()
        && ours
            .iter()
            .zip(theirs.iter())
            .all(|(a, b)| (a - b).abs() <= GRID_RTOL * a.abs().max(1.0));
    if !matches {
        return Err(RelBinError::config(format!(
            "{}: frequency grid differs from the waveform model's grid.",
            detector.name()
        )));
    }
    if (detector.duration() - model.duration()).abs() > GRID_RTOL * model.duration() {
        return Err(RelBinError::config(format!(
            "{}: duration {} s differs from the waveform model's {} s.",
            detector.name(),
            detector.duration(),
            model.duration()
        )));
    }
    Ok(())
}
