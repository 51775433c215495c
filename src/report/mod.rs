//! Reporting utilities: per-detector summaries and formatted terminal output.

use serde::{Deserialize, Serialize};

use crate::domain::CalculatedSnrs;
use crate::error::{RelBinError, Result};
use crate::likelihood::RelativeBinningLikelihood;

pub mod format;

pub use format::*;

/// Bin plan and SNR quantities of one detector at one evaluation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorSummary {
    pub name: String,
    pub minimum_frequency: f64,
    pub maximum_frequency: f64,
    pub n_bins: usize,
    /// `(d|h)` as `[re, im]`.
    pub d_inner_h: [f64; 2],
    pub optimal_snr_squared: f64,
    pub matched_filter_snr: f64,
    /// Length of the per-time-shift series, if one was produced.
    pub time_series_len: Option<usize>,
}

/// Pair each detector of `likelihood` with its SNR quantities.
pub fn detector_summaries(
    likelihood: &RelativeBinningLikelihood,
    snrs: &[CalculatedSnrs],
) -> Result<Vec<DetectorSummary>> {
    if snrs.len() != likelihood.detectors().len() {
        return Err(RelBinError::computation(format!(
            "{} SNR entries for {} detectors.",
            snrs.len(),
            likelihood.detectors().len()
        )));
    }
    Ok(likelihood
        .detectors()
        .iter()
        .zip(likelihood.bins())
        .zip(snrs)
        .map(|((det, bins), s)| DetectorSummary {
            name: det.name().to_string(),
            minimum_frequency: det.minimum_frequency(),
            maximum_frequency: det.maximum_frequency(),
            n_bins: bins.len(),
            d_inner_h: [s.d_inner_h.re, s.d_inner_h.im],
            optimal_snr_squared: s.optimal_snr_squared,
            matched_filter_snr: s.matched_filter_snr(),
            time_series_len: s.d_inner_h_array.as_ref().map(|a| a.len()),
        })
        .collect())
}
