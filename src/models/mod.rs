//! Waveform models.
//!
//! The likelihood core only talks to the [`WaveformModel`] trait. A leading
//! order frequency-domain chirp ([`NewtonianChirp`]) is provided for synthetic
//! studies and tests.

pub mod chirp;
pub mod model;

pub use chirp::*;
pub use model::*;
