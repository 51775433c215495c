//! Numerical primitives: inner products, grid lookup, phase-deviation curves,
//! and the FFT used for time-shifted correlations.

pub mod fft;
pub mod inner;
pub mod phase;

pub use fft::*;
pub use inner::*;
pub use phase::*;
