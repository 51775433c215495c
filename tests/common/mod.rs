#![allow(dead_code)]

use relative_binning::data::{build_network, default_sites, inject_signal, NetworkBand};
use relative_binning::detector::Interferometer;
use relative_binning::domain::Parameters;
use relative_binning::models::NewtonianChirp;

pub fn params(chirp_mass: f64, amplitude: f64, phase: f64) -> Parameters {
    [
        ("chirp_mass", chirp_mass),
        ("mass_ratio", 0.8),
        ("amplitude", amplitude),
        ("phase", phase),
        ("geocent_time", 0.0),
        ("theta_jn", 0.4),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Two-detector network on `model`'s grid with a noiseless injection.
pub fn injected_network(
    model: &NewtonianChirp,
    band: NetworkBand,
    injection: &Parameters,
) -> Vec<Interferometer> {
    let mut detectors = build_network(model, &default_sites(), &band).unwrap();
    inject_signal(&mut detectors, model, injection, None).unwrap();
    detectors
}

pub fn unit_band(minimum_frequency: f64, maximum_frequency: f64) -> NetworkBand {
    NetworkBand {
        minimum_frequency,
        maximum_frequency,
        psd_level: 1.0,
    }
}
