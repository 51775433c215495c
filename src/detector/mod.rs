//! Detector data and response projection.

pub mod interferometer;
pub mod response;

pub use interferometer::*;
pub use response::*;
