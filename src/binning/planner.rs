//! Bin-edge selection from the cumulative phase-deviation curve.
//!
//! Given the usable band of a detector:
//!
//! 1. build the phase-deviation curve `Δφ(f)` over the grid samples in the band
//! 2. `N = floor(Δφ_total / ε)` bins
//! 3. edge `i` sits at the first sample with `Δφ >= (i / N) Δφ_total`
//!
//! Edges that snap to the same grid sample are collapsed, so very narrow
//! bands on coarse grids may end up with fewer than `N` bins.

use log::{debug, info};

use crate::domain::BinSet;
use crate::error::{RelBinError, Result};
use crate::math::{index_at_or_above, phase_deviation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinPlanner {
    chi: f64,
    epsilon: f64,
}

impl BinPlanner {
    pub fn new(chi: f64, epsilon: f64) -> Result<Self> {
        if !(chi.is_finite() && chi > 0.0) {
            return Err(RelBinError::config(format!("chi must be > 0 (got {chi}).")));
        }
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(RelBinError::config(format!(
                "epsilon must be > 0 (got {epsilon})."
            )));
        }
        Ok(Self { chi, epsilon })
    }

    /// Plan bins for the band `[f_min, f_max]` on `frequency_array`.
    ///
    /// Edge indices refer to `frequency_array` itself.
    pub fn plan(
        &self,
        detector: &str,
        frequency_array: &[f64],
        f_min: f64,
        f_max: f64,
    ) -> Result<BinSet> {
        let start = frequency_array.partition_point(|&f| f < f_min);
        let end = frequency_array.partition_point(|&f| f <= f_max);
        if end < start + 2 {
            return Err(RelBinError::config(format!(
                "{detector}: fewer than two grid samples in [{f_min}, {f_max}] Hz."
            )));
        }
        let useful = &frequency_array[start..end];

        let deviation = phase_deviation(useful, f_min, f_max, self.chi);
        let total = deviation[deviation.len() - 1];
        let n_bins = (total / self.epsilon).floor();
        if !(n_bins.is_finite() && n_bins >= 1.0) {
            return Err(RelBinError::config(format!(
                "{detector}: phase deviation {total:.4} rad over [{f_min}, {f_max}] Hz \
                 is smaller than epsilon={}; no bins can be formed.",
                self.epsilon
            )));
        }
        let n_bins = n_bins as usize;

        let mut edges: Vec<(f64, usize)> = Vec::with_capacity(n_bins + 1);
        for i in 0..=n_bins {
            let target = (i as f64 / n_bins as f64) * total;
            let local = deviation.partition_point(|&d| d < target);
            let edge = *useful.get(local).ok_or_else(|| RelBinError::GridLookup {
                detector: detector.to_string(),
                frequency: target,
            })?;
            let index =
                index_at_or_above(frequency_array, edge).ok_or_else(|| RelBinError::GridLookup {
                    detector: detector.to_string(),
                    frequency: edge,
                })?;
            edges.push((edge, index));
        }

        let planned = edges.len();
        edges.dedup_by_key(|(_, index)| *index);
        if edges.len() < planned {
            debug!(
                "{detector}: collapsed {} bin edges narrower than the grid spacing",
                planned - edges.len()
            );
        }

        let (freqs, indices): (Vec<f64>, Vec<usize>) = edges.into_iter().unzip();
        let bins = BinSet::new(freqs, indices)?;
        info!(
            "Set up {} bins for {} between {} Hz and {} Hz",
            bins.len(),
            detector,
            f_min,
            f_max
        );
        Ok(bins)
    }
}
