//! Adaptive frequency-bin planning.
//!
//! Bins are placed so that any waveform whose post-Newtonian phase
//! coefficients differ from the fiducial ones by less than the `chi` bound
//! accumulates at most `epsilon` radians of differential phase per bin.

pub mod planner;

pub use planner::*;
