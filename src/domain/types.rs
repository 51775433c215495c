//! Shared domain types.
//!
//! Arrays that live for the whole run (fiducial waveforms, summary data) are
//! stored as `nalgebra::DVector<Complex64>` so the per-bin sums can use the
//! conjugate-linear `dotc`. Bin geometry stays in plain `Vec<f64>`.

use std::collections::BTreeMap;

use nalgebra::DVector;
use num_complex::Complex64;
use serde::Serialize;

use crate::error::{RelBinError, Result};

/// Mapping from parameter name to value.
///
/// A `BTreeMap` keeps the iteration order stable, which keeps free-parameter
/// vectors and log output deterministic.
pub type Parameters = BTreeMap<String, f64>;

/// Complex frequency-domain series aligned to some frequency grid.
pub type ComplexSeries = DVector<Complex64>;

/// Adaptive frequency-bin partition for one detector.
///
/// Invariants (checked by [`BinSet::new`]):
/// - `edges.len() == indices.len() == n_bins + 1`, with `n_bins >= 1`
/// - edges and indices strictly increasing
/// - `widths[i] = edges[i + 1] - edges[i] > 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSet {
    /// Bin-edge frequencies (Hz).
    pub edges: Vec<f64>,
    /// Index of each edge in the detector's full frequency grid.
    pub indices: Vec<usize>,
    pub widths: Vec<f64>,
    pub centers: Vec<f64>,
}

impl BinSet {
    pub fn new(edges: Vec<f64>, indices: Vec<usize>) -> Result<Self> {
        if edges.len() != indices.len() {
            return Err(RelBinError::config(format!(
                "Bin edge count ({}) != bin index count ({})",
                edges.len(),
                indices.len()
            )));
        }
        if edges.len() < 2 {
            return Err(RelBinError::config(
                "A bin set needs at least two edges (one bin).",
            ));
        }
        for w in edges.windows(2) {
            if !(w[1] > w[0]) {
                return Err(RelBinError::config(format!(
                    "Bin edges must be strictly increasing: {} followed by {}",
                    w[0], w[1]
                )));
            }
        }
        for w in indices.windows(2) {
            if w[1] <= w[0] {
                return Err(RelBinError::config(format!(
                    "Bin indices must be strictly increasing: {} followed by {}",
                    w[0], w[1]
                )));
            }
        }

        let widths = edges.windows(2).map(|w| w[1] - w[0]).collect();
        let centers = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        Ok(Self {
            edges,
            indices,
            widths,
            centers,
        })
    }

    /// Number of bins (one less than the number of edges).
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn first_edge(&self) -> f64 {
        self.edges[0]
    }

    pub fn last_edge(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }
}

/// Per-bin aggregate inner products between the fiducial waveform `h0`, the
/// data `d`, and itself, without (`*0`) and with (`*1`) the `(f - fc)` weight.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryData {
    /// `(h0 | d)`
    pub a0: ComplexSeries,
    /// `(h0 | d (f - fc))`
    pub a1: ComplexSeries,
    /// `(h0 | h0)`
    pub b0: ComplexSeries,
    /// `(h0 | h0 (f - fc))`
    pub b1: ComplexSeries,
}

impl SummaryData {
    pub fn zeros(n_bins: usize) -> Self {
        Self {
            a0: ComplexSeries::zeros(n_bins),
            a1: ComplexSeries::zeros(n_bins),
            b0: ComplexSeries::zeros(n_bins),
            b1: ComplexSeries::zeros(n_bins),
        }
    }

    pub fn len(&self) -> usize {
        self.a0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a0.is_empty()
    }
}

/// First-order expansion of `h / h0` over each bin.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformRatio {
    /// Ratio at the bin center.
    pub r0: ComplexSeries,
    /// Ratio slope across the bin (per Hz).
    pub r1: ComplexSeries,
}

/// SNR quantities for one detector and one candidate.
#[derive(Debug, Clone)]
pub struct CalculatedSnrs {
    pub d_inner_h: Complex64,
    pub optimal_snr_squared: f64,
    pub complex_matched_filter_snr: Complex64,
    /// Per-time-shift `(d|h)` series, only when time marginalization is on.
    pub d_inner_h_array: Option<ComplexSeries>,
}

impl CalculatedSnrs {
    pub fn matched_filter_snr(&self) -> f64 {
        self.complex_matched_filter_snr.norm()
    }
}
