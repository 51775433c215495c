//! SNR quantities from summary data and waveform ratios.
//!
//! ```text
//! (d|h) = Σ_i a0[i] conj(r0[i]) + a1[i] conj(r1[i])
//! (h|h) = Σ_i b0[i] |r0[i]|² + 2 b1[i] Re(r0[i] conj(r1[i]))
//! ```

use num_complex::Complex64;

use crate::detector::Interferometer;
use crate::domain::{ComplexSeries, SummaryData, WaveformRatio};
use crate::error::{RelBinError, Result};
use crate::math::forward_fft;

/// `(d|h)`, `(h|h)` and the complex matched-filter SNR for one detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinnedOverlaps {
    pub d_inner_h: Complex64,
    pub optimal_snr_squared: f64,
    pub complex_matched_filter_snr: Complex64,
}

pub fn binned_overlaps(summary: &SummaryData, ratio: &WaveformRatio) -> Result<BinnedOverlaps> {
    if ratio.r0.len() != summary.len() || ratio.r1.len() != summary.len() {
        return Err(RelBinError::computation(format!(
            "Waveform ratio has {} bins, summary data has {}.",
            ratio.r0.len(),
            summary.len()
        )));
    }

    // dotc conjugates its receiver: r.dotc(a) = Σ conj(r) a.
    let d_inner_h = ratio.r0.dotc(&summary.a0) + ratio.r1.dotc(&summary.a1);

    let h_inner_h: Complex64 = summary
        .b0
        .iter()
        .zip(summary.b1.iter())
        .zip(ratio.r0.iter().zip(ratio.r1.iter()))
        .map(|((b0, b1), (r0, r1))| *b0 * r0.norm_sqr() + *b1 * (2.0 * (*r0 * r1.conj()).re))
        .sum();

    let optimal_snr_squared = h_inner_h.re;
    if !(optimal_snr_squared.is_finite() && optimal_snr_squared > 0.0) {
        return Err(RelBinError::computation(format!(
            "Optimal SNR squared must be finite and > 0 (got {optimal_snr_squared})."
        )));
    }

    Ok(BinnedOverlaps {
        d_inner_h,
        optimal_snr_squared,
        complex_matched_filter_snr: d_inner_h / optimal_snr_squared.sqrt(),
    })
}

/// Per-time-shift `(d|h)` series for time marginalization.
///
/// `4/T · FFT(h · conj(d) / S)` over every sample but the last. Samples
/// outside the detector's band contribute zero.
pub fn d_inner_h_time_series(
    detector: &Interferometer,
    full_waveform: &ComplexSeries,
) -> Result<ComplexSeries> {
    let n = detector.frequency_array().len();
    if full_waveform.len() != n {
        return Err(RelBinError::computation(format!(
            "{}: full waveform has {} samples, grid has {n}.",
            detector.name(),
            full_waveform.len()
        )));
    }

    let band = detector.masked_range()?;
    let strain = detector.strain();
    let psd = detector.power_spectral_density();
    let zero = Complex64::new(0.0, 0.0);
    let integrand: Vec<Complex64> = (0..n - 1)
        .map(|k| {
            if band.contains(&k) {
                full_waveform[k] * strain[k].conj() / psd[k]
            } else {
                zero
            }
        })
        .collect();

    let scale = 4.0 / detector.duration();
    let series = forward_fft(&integrand);
    Ok(ComplexSeries::from_iterator(
        series.len(),
        series.into_iter().map(|v| v * scale),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::FixedAntenna;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn summary() -> SummaryData {
        SummaryData {
            a0: ComplexSeries::from_vec(vec![c(3.0, 1.0), c(2.0, -1.0)]),
            a1: ComplexSeries::from_vec(vec![c(0.5, 0.0), c(-0.2, 0.1)]),
            b0: ComplexSeries::from_vec(vec![c(4.0, 0.0), c(5.0, 0.0)]),
            b1: ComplexSeries::from_vec(vec![c(0.3, 0.0), c(-0.1, 0.0)]),
        }
    }

    #[test]
    fn unit_ratio_reduces_to_bin_sums() {
        let s = summary();
        let ratio = WaveformRatio {
            r0: ComplexSeries::from_vec(vec![c(1.0, 0.0); 2]),
            r1: ComplexSeries::zeros(2),
        };
        let o = binned_overlaps(&s, &ratio).unwrap();
        assert!((o.d_inner_h - c(5.0, 0.0)).norm() < 1e-12);
        assert!((o.optimal_snr_squared - 9.0).abs() < 1e-12);
        assert!((o.complex_matched_filter_snr - c(5.0 / 3.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn slope_terms_enter_with_conjugation() {
        let s = summary();
        let ratio = WaveformRatio {
            r0: ComplexSeries::from_vec(vec![c(0.0, 1.0), c(1.0, 0.0)]),
            r1: ComplexSeries::from_vec(vec![c(0.0, 2.0), c(0.0, 0.0)]),
        };
        let o = binned_overlaps(&s, &ratio).unwrap();
        // (3+i)(-i) + 0.5(-2i) + (2-i) = 1 - 3i - i + 2 - i = 3 - 5i
        assert!((o.d_inner_h - c(3.0, -5.0)).norm() < 1e-12, "{}", o.d_inner_h);
        // 4·1 + 2·0.3·Re(i·(-2i)) + 5 = 4 + 1.2 + 5
        assert!((o.optimal_snr_squared - 10.2).abs() < 1e-12);
    }

    #[test]
    fn vanishing_template_is_an_error() {
        let s = summary();
        let ratio = WaveformRatio {
            r0: ComplexSeries::zeros(2),
            r1: ComplexSeries::zeros(2),
        };
        assert!(binned_overlaps(&s, &ratio).is_err());
    }

    #[test]
    fn time_series_zero_lag_matches_direct_sum() {
        let f: Vec<f64> = (0..16).map(|k| k as f64).collect();
        let mut det = Interferometer::new(
            "H1",
            f,
            vec![2.0; 16],
            4.0,
            2.0,
            12.0,
            Box::new(FixedAntenna::new(1.0, 0.0, 0.0)),
        )
        .unwrap();
        let d = ComplexSeries::from_iterator(16, (0..16).map(|k| c(k as f64, 1.0)));
        det.set_strain(d.clone()).unwrap();
        let h = ComplexSeries::from_vec(vec![c(1.0, 0.0); 16]);

        let series = d_inner_h_time_series(&det, &h).unwrap();
        assert_eq!(series.len(), 15);
        let direct: Complex64 = (2..=12).map(|k| d[k].conj() / 2.0).sum::<Complex64>() * (4.0 / 4.0);
        assert!((series[0] - direct).norm() < 1e-10);
    }
}
