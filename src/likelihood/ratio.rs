//! Waveform-ratio reconstruction.
//!
//! A candidate waveform is evaluated only at bin edges. Its ratio to the
//! fiducial waveform is then expanded to first order across each bin:
//!
//! ```text
//! r(f) ≈ r0[i] + r1[i] (f - center[i])      for f in bin i
//! r0[i] = (r(e_i) + r(e_{i+1})) / 2
//! r1[i] = (r(e_{i+1}) - r(e_i)) / width[i]
//! ```

use num_complex::Complex64;

use crate::domain::{BinSet, ComplexSeries, WaveformRatio};
use crate::error::{RelBinError, Result};

/// Build `(r0, r1)` from a candidate and the fiducial, both sampled at edges.
pub fn compute_waveform_ratio(
    detector: &str,
    strain_at_edges: &ComplexSeries,
    fiducial_at_edges: &ComplexSeries,
    bins: &BinSet,
) -> Result<WaveformRatio> {
    let n_edges = bins.edges.len();
    if strain_at_edges.len() != n_edges || fiducial_at_edges.len() != n_edges {
        return Err(RelBinError::computation(format!(
            "{detector}: expected {n_edges} edge samples, got {} (candidate) and {} (fiducial).",
            strain_at_edges.len(),
            fiducial_at_edges.len()
        )));
    }

    let zero = Complex64::new(0.0, 0.0);
    let mut ratio = Vec::with_capacity(n_edges);
    for (k, (h, h0)) in strain_at_edges.iter().zip(fiducial_at_edges.iter()).enumerate() {
        if *h0 == zero {
            return Err(RelBinError::ZeroFiducial {
                detector: detector.to_string(),
                frequency: bins.edges[k],
            });
        }
        ratio.push(h / h0);
    }

    let n_bins = bins.len();
    let r0 = ComplexSeries::from_iterator(
        n_bins,
        ratio.windows(2).map(|w| (w[1] + w[0]) * 0.5),
    );
    let r1 = ComplexSeries::from_iterator(
        n_bins,
        ratio
            .windows(2)
            .zip(bins.widths.iter())
            .map(|(w, &width)| (w[1] - w[0]) / width),
    );
    Ok(WaveformRatio { r0, r1 })
}

/// Full-resolution approximation of the candidate waveform.
///
/// Samples outside the binned band are zero.
pub fn reconstruct_full_waveform(
    fiducial: &ComplexSeries,
    frequency_array: &[f64],
    ratio: &WaveformRatio,
    bins: &BinSet,
) -> Result<ComplexSeries> {
    if fiducial.len() != frequency_array.len() {
        return Err(RelBinError::computation(format!(
            "Fiducial waveform has {} samples, grid has {}.",
            fiducial.len(),
            frequency_array.len()
        )));
    }
    if ratio.r0.len() != bins.len() || ratio.r1.len() != bins.len() {
        return Err(RelBinError::computation(
            "Waveform ratio does not match the bin count.",
        ));
    }

    let mut full = ComplexSeries::zeros(frequency_array.len());
    for i in 0..bins.len() {
        let (start, end) = (bins.indices[i], bins.indices[i + 1]);
        if end > frequency_array.len() {
            return Err(RelBinError::computation("Bin edge index outside the grid."));
        }
        for k in start..end {
            let r = ratio.r0[i] + ratio.r1[i] * (frequency_array[k] - bins.centers[i]);
            full[k] = fiducial[k] * r;
        }
    }
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn identical_waveforms_give_unit_ratio() {
        let bins = BinSet::new(vec![10.0, 12.0, 15.0], vec![0, 2, 5]).unwrap();
        let h = ComplexSeries::from_vec(vec![c(1.0, 2.0), c(-0.5, 0.1), c(0.3, 0.3)]);
        let ratio = compute_waveform_ratio("H1", &h, &h, &bins).unwrap();
        for i in 0..2 {
            assert_eq!(ratio.r0[i], c(1.0, 0.0));
            assert_eq!(ratio.r1[i], c(0.0, 0.0));
        }
    }

    #[test]
    fn linear_ratio_is_recovered_exactly() {
        // r(f) = 1 + 0.1 i f is linear, so the expansion is exact everywhere.
        let f: Vec<f64> = (0..12).map(|k| 10.0 + k as f64).collect();
        let bins = BinSet::new(vec![10.0, 14.0, 21.0], vec![0, 4, 11]).unwrap();
        let h0 = ComplexSeries::from_iterator(12, f.iter().map(|&x| c(1.0 + 0.01 * x, -0.2)));
        let r = |x: f64| c(1.0, 0.1 * x);

        let h_edges = ComplexSeries::from_iterator(3, bins.indices.iter().map(|&i| h0[i] * r(f[i])));
        let h0_edges = ComplexSeries::from_iterator(3, bins.indices.iter().map(|&i| h0[i]));
        let ratio = compute_waveform_ratio("H1", &h_edges, &h0_edges, &bins).unwrap();
        assert!((ratio.r0[0] - r(12.0)).norm() < 1e-12);
        assert!((ratio.r1[1] - c(0.0, 0.1)).norm() < 1e-12);

        let full = reconstruct_full_waveform(&h0, &f, &ratio, &bins).unwrap();
        for k in 0..11 {
            assert!((full[k] - h0[k] * r(f[k])).norm() < 1e-12, "k={k}");
        }
        // Last edge sample is outside every half-open bin.
        assert_eq!(full[11], c(0.0, 0.0));
    }

    #[test]
    fn zero_fiducial_edge_is_an_error() {
        let bins = BinSet::new(vec![10.0, 12.0], vec![0, 2]).unwrap();
        let h = ComplexSeries::from_vec(vec![c(1.0, 0.0), c(1.0, 0.0)]);
        let h0 = ComplexSeries::from_vec(vec![c(1.0, 0.0), c(0.0, 0.0)]);
        let err = compute_waveform_ratio("L1", &h, &h0, &bins).unwrap_err();
        assert!(matches!(err, RelBinError::ZeroFiducial { frequency, .. } if frequency == 12.0));
    }
}
