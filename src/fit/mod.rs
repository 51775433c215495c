//! Fiducial-point search.
//!
//! Responsibilities:
//!
//! - derive free parameters and their bounds from priors
//! - minimize the negative log-likelihood ratio with a global minimizer
//!   (differential evolution by default, population evaluated in parallel)
//! - move the likelihood's fiducial point to the optimum, round by round

pub mod fiducial;
pub mod optimizer;
pub mod prior;

pub use fiducial::*;
pub use optimizer::*;
pub use prior::*;
