//! `relative-binning` library crate.
//!
//! Relative-binning likelihood for frequency-domain gravitational-wave
//! templates: instead of evaluating a candidate waveform on every frequency
//! sample, it is evaluated at a few bin edges and expanded linearly about a
//! fiducial waveform whose per-bin summary data were precomputed.
//!
//! The binary (`rb`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the likelihood can be embedded in other samplers

pub mod app;
pub mod binning;
pub mod cli;
pub mod data;
pub mod detector;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod likelihood;
pub mod math;
pub mod models;
pub mod report;
