//! Relative-binning likelihood.
//!
//! Responsibilities:
//!
//! - build and refresh the fiducial (reference) waveform per detector
//! - precompute per-bin summary data from data, fiducial waveform, and PSD
//! - reconstruct candidate/fiducial ratios from bin-edge evaluations
//! - turn summary data and ratios into SNR quantities and likelihoods

pub mod base;
pub mod fiducial;
pub mod ratio;
pub mod relative;
pub mod snr;
pub mod summary;

pub use base::*;
pub use fiducial::*;
pub use ratio::*;
pub use relative::*;
pub use snr::*;
pub use summary::*;
