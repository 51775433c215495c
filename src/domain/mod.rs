//! Domain types used throughout the relative-binning core.
//!
//! This module defines:
//!
//! - parameter maps and complex frequency series (`Parameters`, `ComplexSeries`)
//! - the per-detector bin partition (`BinSet`)
//! - per-bin summary statistics and per-evaluation waveform ratios
//! - SNR outputs (`CalculatedSnrs`)
//! - tunable configuration (`RelativeBinningConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
