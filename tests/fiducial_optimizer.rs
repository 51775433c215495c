mod common;

use std::collections::BTreeMap;
use std::f64::consts::PI;

use relative_binning::domain::{Parameters, RelativeBinningConfig};
use relative_binning::error::RelBinError;
use relative_binning::fit::{
    build_likelihood, DifferentialEvolution, DifferentialEvolutionOptions, FiducialOptimizer,
    Prior, PriorDict,
};
use relative_binning::likelihood::RelativeBinningLikelihood;
use relative_binning::models::NewtonianChirp;

use common::{injected_network, params, unit_band};

fn priors(injection: &Parameters) -> PriorDict {
    let mut priors: PriorDict = injection
        .iter()
        .map(|(k, &v)| (k.clone(), Prior::DeltaFunction { peak: v }))
        .collect();
    priors.insert("amplitude".into(), Prior::Uniform { minimum: 0.5, maximum: 2.0 });
    priors.insert("phase".into(), Prior::Uniform { minimum: -PI, maximum: PI });
    priors
}

fn minimizer() -> DifferentialEvolution {
    DifferentialEvolution::new(DifferentialEvolutionOptions {
        population_size: 10,
        max_generations: 80,
        seed: 5,
        ..Default::default()
    })
    .unwrap()
}

fn start_likelihood() -> (RelativeBinningLikelihood, Parameters) {
    let model = NewtonianChirp::with_uniform_grid(4.0, 4096).unwrap();
    let injection = params(10.0, 1.0, 0.0);
    let detectors = injected_network(&model, unit_band(20.0, 128.0), &injection);
    let start = params(10.0, 1.2, 0.5);
    let likelihood = RelativeBinningLikelihood::new(
        detectors,
        Box::new(model),
        start,
        RelativeBinningConfig::default(),
    )
    .unwrap();
    (likelihood, injection)
}

#[test]
fn optimizer_recovers_amplitude_and_phase() {
    let (mut likelihood, injection) = start_likelihood();
    let bins_before = likelihood.bins().to_vec();
    let summary_before = likelihood.summary_data().to_vec();

    let optimizer = FiducialOptimizer::from_priors(&priors(&injection), None, 2).unwrap();
    let result = optimizer.optimize(&mut likelihood, &minimizer()).unwrap();

    assert!((result["amplitude"] - 1.0).abs() < 1e-2, "{result:?}");
    assert!(result["phase"].abs() < 1e-2, "{result:?}");
    assert_eq!(result["chirp_mass"], 10.0);
    assert_eq!(likelihood.fiducial_parameters(), &result);

    // Bins stay put; summary data follow the new fiducial.
    assert_eq!(likelihood.bins(), bins_before.as_slice());
    assert_ne!(likelihood.summary_data()[0], summary_before[0]);

    // Expanded about the injection, the matched-filter identity holds again.
    let snrs = likelihood.detector_snrs(&result).unwrap();
    let total: f64 = snrs.iter().map(|s| s.optimal_snr_squared).sum();
    let llr = likelihood.log_likelihood_ratio(&result).unwrap();
    assert!((llr - 0.5 * total).abs() < 2e-2 * total);
}

#[test]
fn free_parameter_missing_from_the_fiducial_is_a_configuration_error() {
    let (mut likelihood, injection) = start_likelihood();
    let summary_before = likelihood.summary_data().to_vec();
    let mut priors = priors(&injection);
    priors.insert("spin".into(), Prior::Uniform { minimum: -0.5, maximum: 0.5 });

    let optimizer = FiducialOptimizer::from_priors(&priors, None, 1).unwrap();
    let err = optimizer.optimize(&mut likelihood, &minimizer()).unwrap_err();
    assert!(matches!(err, RelBinError::Config(_)));
    assert_eq!(likelihood.fiducial_parameters(), &params(10.0, 1.2, 0.5));
    assert_eq!(likelihood.summary_data(), summary_before.as_slice());
}

#[test]
fn build_likelihood_runs_the_search_when_enabled() {
    let model = NewtonianChirp::with_uniform_grid(4.0, 4096).unwrap();
    let injection = params(10.0, 1.0, 0.0);
    let detectors = injected_network(&model, unit_band(20.0, 128.0), &injection);
    let config = RelativeBinningConfig {
        update_fiducial_parameters: true,
        optimizer_rounds: 1,
        ..Default::default()
    };
    let bounds: BTreeMap<String, (f64, f64)> = [
        ("amplitude".to_string(), (0.8, 1.5)),
        ("phase".to_string(), (-1.0, 1.0)),
    ]
    .into();
    let likelihood = build_likelihood(
        detectors,
        Box::new(model),
        params(10.0, 1.2, 0.5),
        config,
        Some(&priors(&injection)),
        Some(&bounds),
        &minimizer(),
    )
    .unwrap();
    let fiducial = likelihood.fiducial_parameters();
    assert!((fiducial["amplitude"] - 1.0).abs() < 1e-2);
    assert!(fiducial["phase"].abs() < 1e-2);
}

#[test]
fn update_without_priors_is_a_configuration_error() {
    let model = NewtonianChirp::with_uniform_grid(4.0, 1024).unwrap();
    let injection = params(10.0, 1.0, 0.0);
    let detectors = injected_network(&model, unit_band(20.0, 128.0), &injection);
    let config = RelativeBinningConfig {
        update_fiducial_parameters: true,
        ..Default::default()
    };
    let err = build_likelihood(
        detectors,
        Box::new(model),
        injection,
        config,
        None,
        None,
        &minimizer(),
    )
    .unwrap_err();
    assert!(matches!(err, RelBinError::Config(_)));
}

#[test]
fn degenerate_bounds_fail_before_any_waveform_work() {
    let model = NewtonianChirp::with_uniform_grid(4.0, 1024).unwrap();
    let injection = params(10.0, 1.0, 0.0);
    let detectors = injected_network(&model, unit_band(20.0, 128.0), &injection);
    let config = RelativeBinningConfig {
        update_fiducial_parameters: true,
        ..Default::default()
    };
    let bounds: BTreeMap<String, (f64, f64)> = [
        ("amplitude".to_string(), (1.0, 1.0)),
        ("phase".to_string(), (-1.0, 1.0)),
    ]
    .into();
    // A zero-amplitude fiducial would otherwise fail as degenerate.
    let err = build_likelihood(
        detectors,
        Box::new(model),
        params(10.0, 0.0, 0.0),
        config,
        Some(&priors(&injection)),
        Some(&bounds),
        &minimizer(),
    )
    .unwrap_err();
    assert!(matches!(err, RelBinError::Config(_)));
}
