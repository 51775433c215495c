//! Detector networks on a waveform model's frequency grid.

use serde::{Deserialize, Serialize};

use crate::detector::{FixedAntenna, Interferometer};
use crate::error::{RelBinError, Result};
use crate::models::WaveformModel;

/// One detector of a synthetic network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorSite {
    pub name: String,
    pub f_plus: f64,
    pub f_cross: f64,
    /// Arrival delay relative to the geocenter (s).
    pub time_delay: f64,
}

impl DetectorSite {
    pub fn new(name: impl Into<String>, f_plus: f64, f_cross: f64, time_delay: f64) -> Self {
        Self {
            name: name.into(),
            f_plus,
            f_cross,
            time_delay,
        }
    }
}

/// Two sites with distinct antenna patterns and a 10 ms relative delay.
pub fn default_sites() -> Vec<DetectorSite> {
    vec![
        DetectorSite::new("H1", 0.6, 0.3, 0.0),
        DetectorSite::new("L1", -0.5, 0.4, 0.01),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkBand {
    pub minimum_frequency: f64,
    pub maximum_frequency: f64,
    /// Flat one-sided PSD level.
    pub psd_level: f64,
}

impl Default for NetworkBand {
    fn default() -> Self {
        Self {
            minimum_frequency: 20.0,
            maximum_frequency: 1024.0,
            psd_level: 1.0,
        }
    }
}

/// Build one [`Interferometer`] per site on `model`'s grid, with zero strain.
pub fn build_network(
    model: &dyn WaveformModel,
    sites: &[DetectorSite],
    band: &NetworkBand,
) -> Result<Vec<Interferometer>> {
    if sites.is_empty() {
        return Err(RelBinError::config("A network needs at least one site."));
    }
    if !(band.psd_level.is_finite() && band.psd_level > 0.0) {
        return Err(RelBinError::config(format!(
            "PSD level must be finite and > 0 (got {}).",
            band.psd_level
        )));
    }

    let frequency_array = model.frequency_array();
    sites
        .iter()
        .map(|site| {
            Interferometer::new(
                site.name.clone(),
                frequency_array.to_vec(),
                vec![band.psd_level; frequency_array.len()],
                model.duration(),
                band.minimum_frequency,
                band.maximum_frequency,
                Box::new(FixedAntenna::new(site.f_plus, site.f_cross, site.time_delay)),
            )
        })
        .collect()
}
