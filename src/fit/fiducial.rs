//! Fiducial-point search.
//!
//! The relative-binning expansion is only accurate near the fiducial point,
//! so it pays to move that point to (a local maximum of) the likelihood ratio
//! before sampling. Each round minimizes `-ln Λ` over the free parameters and
//! then refreshes the fiducial waveforms and summary data. Bins are kept.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::detector::Interferometer;
use crate::domain::{Parameters, RelativeBinningConfig};
use crate::error::{RelBinError, Result};
use crate::fit::optimizer::GlobalMinimizer;
use crate::fit::prior::{
    bounds_from_map, bounds_from_priors, free_parameters, Bounds, ParameterMapping, PriorDict,
};
use crate::likelihood::RelativeBinningLikelihood;
use crate::models::WaveformModel;

#[derive(Debug, Clone)]
pub struct FiducialOptimizer {
    mapping: ParameterMapping,
    bounds: Vec<Bounds>,
    rounds: usize,
}

impl FiducialOptimizer {
    /// Free parameters come from `priors`; their bounds from `explicit_bounds`
    /// when given, else from each prior's range.
    pub fn from_priors(
        priors: &PriorDict,
        explicit_bounds: Option<&BTreeMap<String, (f64, f64)>>,
        rounds: usize,
    ) -> Result<Self> {
        if rounds == 0 {
            return Err(RelBinError::config("Optimizer rounds must be >= 1."));
        }
        let names = free_parameters(priors);
        if names.is_empty() {
            return Err(RelBinError::config(
                "No free parameters: every prior is fixed or a constraint.",
            ));
        }
        let bounds = match explicit_bounds {
            Some(map) => bounds_from_map(map, &names)?,
            None => bounds_from_priors(priors, &names)?,
        };
        Ok(Self {
            mapping: ParameterMapping::new(names),
            bounds,
            rounds,
        })
    }

    pub fn parameter_names(&self) -> &[String] {
        self.mapping.names()
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Run every round and leave `likelihood` expanded about the result.
    ///
    /// The current fiducial point must carry every free parameter. If a
    /// round's refresh fails, the error is returned and `likelihood` stays
    /// expanded about the previous round's point.
    pub fn optimize(
        &self,
        likelihood: &mut RelativeBinningLikelihood,
        minimizer: &dyn GlobalMinimizer,
    ) -> Result<Parameters> {
        info!(
            "Parameters over which likelihood is maximized: {:?}",
            self.mapping.names()
        );
        for round in 0..self.rounds {
            info!("Optimizing fiducial parameters. Iteration : {}", round + 1);
            let base = likelihood.fiducial_parameters().clone();
            let start = self.mapping.to_vector(&base)?;
            debug!("Round {} starting point: {:?}", round + 1, start);
            let best = {
                let current: &RelativeBinningLikelihood = likelihood;
                let objective = |values: &[f64]| {
                    let candidate = self.mapping.to_parameters(values, &base);
                    match current.log_likelihood_ratio(&candidate) {
                        Ok(llr) => -llr,
                        Err(_) => f64::INFINITY,
                    }
                };
                minimizer.minimize(&objective, &self.bounds)?
            };
            let updated = self.mapping.to_parameters(&best, &base);
            debug!("Round {} fiducial parameters: {:?}", round + 1, updated);
            likelihood.set_fiducial_parameters(updated)?;
        }
        Ok(likelihood.fiducial_parameters().clone())
    }
}

/// Construct the likelihood and, when `config.update_fiducial_parameters` is
/// set, move the fiducial point with `minimizer` before returning.
pub fn build_likelihood(
    detectors: Vec<Interferometer>,
    model: Box<dyn WaveformModel>,
    fiducial_parameters: Parameters,
    config: RelativeBinningConfig,
    priors: Option<&PriorDict>,
    explicit_bounds: Option<&BTreeMap<String, (f64, f64)>>,
    minimizer: &dyn GlobalMinimizer,
) -> Result<RelativeBinningLikelihood> {
    // Bounds are validated before any waveform work.
    let optimizer = if config.update_fiducial_parameters {
        let priors = priors.ok_or_else(|| {
            RelBinError::config("Updating fiducial parameters requires priors.")
        })?;
        Some(FiducialOptimizer::from_priors(
            priors,
            explicit_bounds,
            config.optimizer_rounds,
        )?)
    } else {
        None
    };

    let mut likelihood =
        RelativeBinningLikelihood::new(detectors, model, fiducial_parameters, config)?;
    if let Some(optimizer) = optimizer {
        optimizer.optimize(&mut likelihood, minimizer)?;
    }
    Ok(likelihood)
}
