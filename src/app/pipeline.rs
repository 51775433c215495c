//! Shared run logic for the `rb` subcommands.
//!
//! Every command follows the same workflow:
//! config (env + CLI) -> model + network -> injection -> likelihood -> evaluations
//!
//! `app` only decides what to print and export.

use std::f64::consts::PI;

use log::info;

use crate::cli::{EvaluateArgs, OptimizeArgs, SignalArgs};
use crate::data::{build_network, default_sites, inject_signal, NetworkBand};
use crate::detector::Interferometer;
use crate::domain::{Parameters, RelativeBinningConfig};
use crate::error::Result;
use crate::fit::{build_likelihood, DifferentialEvolution, DifferentialEvolutionOptions, Prior, PriorDict};
use crate::io::Evaluated;
use crate::likelihood::RelativeBinningLikelihood;
use crate::models::NewtonianChirp;
use crate::report::detector_summaries;

/// Model, injected network, and configuration of one run.
#[derive(Debug)]
pub struct Scenario {
    pub model: NewtonianChirp,
    pub detectors: Vec<Interferometer>,
    pub injection: Parameters,
    pub config: RelativeBinningConfig,
}

/// Environment defaults (`RB_*`, `.env`) overridden by explicit CLI values.
pub fn config_from_args(args: &SignalArgs) -> Result<RelativeBinningConfig> {
    let mut config = RelativeBinningConfig::from_env()?;
    if let Some(chi) = args.chi {
        config.chi = chi;
    }
    if let Some(epsilon) = args.epsilon {
        config.epsilon = epsilon;
    }
    config.time_marginalization |= args.time_marginalization;
    config.validate()?;
    Ok(config)
}

pub fn injection_parameters(args: &SignalArgs) -> Parameters {
    [
        ("chirp_mass", args.chirp_mass),
        ("mass_ratio", args.mass_ratio),
        ("amplitude", args.amplitude),
        ("phase", args.phase),
        ("geocent_time", 0.0),
        ("theta_jn", args.theta_jn),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

pub fn build_scenario(args: &SignalArgs) -> Result<Scenario> {
    let config = config_from_args(args)?;
    let model = NewtonianChirp::with_uniform_grid(args.duration, args.samples)?;
    let band = NetworkBand {
        minimum_frequency: args.f_min,
        maximum_frequency: args.f_max,
        psd_level: args.psd,
    };
    let mut detectors = build_network(&model, &default_sites(), &band)?;
    let injection = injection_parameters(args);
    inject_signal(&mut detectors, &model, &injection, args.noise_seed)?;
    info!(
        "Injected signal into {} detectors ({})",
        detectors.len(),
        if args.noise_seed.is_some() { "with noise" } else { "noiseless" }
    );
    Ok(Scenario {
        model,
        detectors,
        injection,
        config,
    })
}

/// Likelihood expanded about the injection.
pub fn run_bins(args: &SignalArgs) -> Result<RelativeBinningLikelihood> {
    let scenario = build_scenario(args)?;
    RelativeBinningLikelihood::new(
        scenario.detectors,
        Box::new(scenario.model),
        scenario.injection,
        scenario.config,
    )
}

pub fn evaluate_at(
    likelihood: &RelativeBinningLikelihood,
    label: &str,
    parameters: &Parameters,
) -> Result<Evaluated> {
    let snrs = likelihood.detector_snrs(parameters)?;
    let log_likelihood_ratio = likelihood.log_likelihood_ratio(parameters)?;
    Ok(Evaluated {
        label: label.to_string(),
        parameters: parameters.clone(),
        detectors: detector_summaries(likelihood, &snrs)?,
        log_likelihood_ratio,
    })
}

#[derive(Debug)]
pub struct EvaluateOutput {
    pub likelihood: RelativeBinningLikelihood,
    pub evaluations: Vec<Evaluated>,
    pub noise_log_likelihood: f64,
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<EvaluateOutput> {
    let likelihood = run_bins(&args.signal)?;
    let injection = likelihood.fiducial_parameters().clone();
    let mut offset = injection.clone();
    if let Some(mc) = offset.get_mut("chirp_mass") {
        *mc *= 1.0 + args.offset;
    }

    let evaluations = vec![
        evaluate_at(&likelihood, "injection", &injection)?,
        evaluate_at(&likelihood, "offset", &offset)?,
    ];
    let noise_log_likelihood = likelihood.noise_log_likelihood()?;
    Ok(EvaluateOutput {
        likelihood,
        evaluations,
        noise_log_likelihood,
    })
}

#[derive(Debug)]
pub struct OptimizeOutput {
    pub likelihood: RelativeBinningLikelihood,
    pub start: Parameters,
    pub injection: Parameters,
    pub evaluations: Vec<Evaluated>,
}

/// Free amplitude and phase around the injection; everything else fixed.
pub fn optimization_priors(injection: &Parameters, args: &SignalArgs) -> PriorDict {
    let mut priors: PriorDict = injection
        .iter()
        .map(|(k, &v)| (k.clone(), Prior::DeltaFunction { peak: v }))
        .collect();
    let amplitude = args.amplitude.abs();
    priors.insert(
        "amplitude".to_string(),
        Prior::Uniform {
            minimum: 0.25 * amplitude,
            maximum: 2.0 * amplitude,
        },
    );
    priors.insert(
        "phase".to_string(),
        Prior::Uniform {
            minimum: args.phase - PI,
            maximum: args.phase + PI,
        },
    );
    priors
}

pub fn run_optimize(args: &OptimizeArgs) -> Result<OptimizeOutput> {
    let scenario = build_scenario(&args.signal)?;
    let mut config = scenario.config;
    config.update_fiducial_parameters = true;
    if let Some(rounds) = args.rounds {
        config.optimizer_rounds = rounds;
    }
    config.validate()?;

    let mut start = scenario.injection.clone();
    if let Some(a) = start.get_mut("amplitude") {
        *a *= 1.0 + args.amplitude_offset;
    }
    if let Some(p) = start.get_mut("phase") {
        *p += args.phase_offset;
    }

    let minimizer = DifferentialEvolution::new(DifferentialEvolutionOptions {
        population_size: args.population,
        max_generations: args.generations,
        seed: args.seed,
        ..Default::default()
    })?;
    let priors = optimization_priors(&scenario.injection, &args.signal);

    let likelihood = build_likelihood(
        scenario.detectors,
        Box::new(scenario.model),
        start.clone(),
        config,
        Some(&priors),
        None,
        &minimizer,
    )?;

    let fiducial = likelihood.fiducial_parameters().clone();
    let evaluations = vec![
        evaluate_at(&likelihood, "start", &start)?,
        evaluate_at(&likelihood, "optimized", &fiducial)?,
        evaluate_at(&likelihood, "injection", &scenario.injection)?,
    ];
    Ok(OptimizeOutput {
        likelihood,
        start,
        injection: scenario.injection,
        evaluations,
    })
}
