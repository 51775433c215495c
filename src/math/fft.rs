//! Forward FFT wrapper.
//!
//! The transform is unnormalized (`X_k = Σ x_n e^{-2πi kn/N}`), which is the
//! convention the time-shifted `(d|h)` series relies on.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Forward FFT of `input`, returning a new buffer.
pub fn forward_fft(input: &[Complex64]) -> Vec<Complex64> {
    let mut buffer = input.to_vec();
    if buffer.is_empty() {
        return buffer;
    }
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_of_impulse_is_flat() {
        let mut x = vec![Complex64::new(0.0, 0.0); 8];
        x[0] = Complex64::new(1.0, 0.0);
        let y = forward_fft(&x);
        for v in y {
            assert!((v - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn fft_dc_bin_is_the_sum() {
        let x: Vec<Complex64> = (0..5).map(|i| Complex64::new(i as f64, 1.0)).collect();
        let y = forward_fft(&x);
        assert!((y[0] - Complex64::new(10.0, 5.0)).norm() < 1e-12);
    }
}
