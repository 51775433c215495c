//! Synthetic data for studies, tests, and the `rb` binary.
//!
//! - a small detector network on a model's frequency grid (`network`)
//! - signal injection with optional seeded Gaussian noise (`injection`)

pub mod injection;
pub mod network;

pub use injection::*;
pub use network::*;
