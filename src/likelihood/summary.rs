//! Per-bin summary data.
//!
//! For bin `i` with samples `[s_i, s_{i+1})` of the masked grid and center
//! `fc = (f[s_i] + f[s_{i+1}]) / 2`:
//!
//! ```text
//! a0[i] = (h0 | d)              b0[i] = (h0 | h0)
//! a1[i] = (h0 | d (f - fc))     b1[i] = (h0 | h0 (f - fc))
//! ```
//!
//! These depend only on the data and the fiducial waveform, so they are
//! computed once per fiducial update and reused for every evaluation.

use num_complex::Complex64;

use crate::detector::Interferometer;
use crate::domain::{BinSet, ComplexSeries, SummaryData};
use crate::error::{RelBinError, Result};
use crate::math::{index_at_or_above, noise_weighted_inner_product, GRID_RTOL};

/// Locate each bin edge inside the detector's masked grid.
///
/// The lookup is at-or-above with a relative tolerance and must land on the
/// edge frequency itself; anything else means the bins no longer fit the
/// detector's band.
pub fn masked_edge_indices(detector: &Interferometer, bins: &BinSet) -> Result<Vec<usize>> {
    let range = detector.masked_range()?;
    let masked = &detector.frequency_array()[range];
    bins.edges
        .iter()
        .map(|&edge| {
            let tol = GRID_RTOL * edge.abs().max(1.0);
            index_at_or_above(masked, edge)
                .filter(|&i| (masked[i] - edge).abs() <= tol)
                .ok_or_else(|| RelBinError::GridLookup {
                    detector: detector.name().to_string(),
                    frequency: edge,
                })
        })
        .collect()
}

/// Compile summary data for one detector.
pub fn compile_summary_data(
    detector: &Interferometer,
    fiducial: &ComplexSeries,
    bins: &BinSet,
) -> Result<SummaryData> {
    if fiducial.len() != detector.frequency_array().len() {
        return Err(RelBinError::computation(format!(
            "{}: fiducial waveform has {} samples, grid has {}.",
            detector.name(),
            fiducial.len(),
            detector.frequency_array().len()
        )));
    }

    let range = detector.masked_range()?;
    let edges = masked_edge_indices(detector, bins)?;
    let frequencies = &detector.frequency_array()[range.clone()];
    let strain = &detector.strain().as_slice()[range.clone()];
    let h0 = &fiducial.as_slice()[range.clone()];
    let psd = &detector.power_spectral_density()[range];
    let duration = detector.duration();

    let n_bins = bins.len();
    let mut summary = SummaryData::zeros(n_bins);
    for i in 0..n_bins {
        let (start, end) = (edges[i], edges[i + 1]);
        let central_frequency = 0.5 * (frequencies[start] + frequencies[end]);

        let f_i = &frequencies[start..end];
        let d_i = &strain[start..end];
        let h0_i = &h0[start..end];
        let psd_i = &psd[start..end];

        let offset = |series: &[Complex64]| -> Vec<Complex64> {
            series
                .iter()
                .zip(f_i.iter())
                .map(|(v, &f)| *v * (f - central_frequency))
                .collect()
        };

        summary.a0[i] = noise_weighted_inner_product(h0_i, d_i, psd_i, duration);
        summary.b0[i] = noise_weighted_inner_product(h0_i, h0_i, psd_i, duration);
        summary.a1[i] = noise_weighted_inner_product(h0_i, &offset(d_i), psd_i, duration);
        summary.b1[i] = noise_weighted_inner_product(h0_i, &offset(h0_i), psd_i, duration);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::FixedAntenna;

    fn detector(strain: Vec<Complex64>) -> Interferometer {
        let f: Vec<f64> = (0..32).map(|k| k as f64).collect();
        let psd = vec![2.0; 32];
        let mut det = Interferometer::new(
            "V1",
            f,
            psd,
            4.0,
            4.0,
            20.0,
            Box::new(FixedAntenna::new(1.0, 0.0, 0.0)),
        )
        .unwrap();
        det.set_strain(ComplexSeries::from_vec(strain)).unwrap();
        det
    }

    #[test]
    fn constant_waveform_gives_closed_form_sums() {
        let one = Complex64::new(1.0, 0.0);
        let det = detector(vec![one; 32]);
        let h0 = ComplexSeries::from_vec(vec![one; 32]);
        let bins = BinSet::new(vec![4.0, 8.0, 20.0], vec![4, 8, 20]).unwrap();
        let summary = compile_summary_data(&det, &h0, &bins).unwrap();

        // 4/T / psd = 0.5 per sample.
        assert!((summary.b0[0].re - 2.0).abs() < 1e-12);
        assert!((summary.b0[1].re - 6.0).abs() < 1e-12);
        assert_eq!(summary.a0, summary.b0);
        // Bin 0 covers f = 4..7 with fc = 6: offsets -2,-1,0,1 sum to -2.
        assert!((summary.b1[0].re + 1.0).abs() < 1e-12);
        // Bin 1 covers f = 8..19 with fc = 14: offsets sum to -6.
        assert!((summary.b1[1].re + 3.0).abs() < 1e-12);
    }

    #[test]
    fn edges_outside_the_band_fail_lookup() {
        let one = Complex64::new(1.0, 0.0);
        let det = detector(vec![one; 32]);
        let h0 = ComplexSeries::from_vec(vec![one; 32]);
        let bins = BinSet::new(vec![4.0, 8.0, 25.0], vec![4, 8, 25]).unwrap();
        let err = compile_summary_data(&det, &h0, &bins).unwrap_err();
        assert!(matches!(err, RelBinError::GridLookup { frequency, .. } if frequency == 25.0));
    }

    #[test]
    fn masked_indices_are_relative_to_band_start() {
        let det = detector(vec![Complex64::new(0.0, 0.0); 32]);
        let bins = BinSet::new(vec![4.0, 10.0, 20.0], vec![4, 10, 20]).unwrap();
        assert_eq!(masked_edge_indices(&det, &bins).unwrap(), vec![0, 6, 16]);
    }
}
