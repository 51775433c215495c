//! Error type shared by the library and the `rb` binary.
//!
//! Every failure mode of the relative-binning core surfaces as a variant here.
//! Nothing is masked to a numeric sentinel: an all-zero fiducial, an empty bin
//! plan, or a zero fiducial sample at a bin edge all stop the computation.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RelBinError>;

#[derive(Error, Debug)]
pub enum RelBinError {
    /// Invalid tuning parameters, bounds, or missing inputs.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The fiducial polarizations carry no nonzero sample.
    #[error("Fiducial waveform is identically zero for parameters {0}")]
    DegenerateFiducial(String),

    /// A bin-edge frequency could not be located on a frequency grid.
    #[error("No grid frequency at or above {frequency} Hz for detector {detector}")]
    GridLookup { detector: String, frequency: f64 },

    /// A fiducial sample at a bin edge is zero, so the waveform ratio is undefined.
    #[error("Fiducial waveform for {detector} vanishes at bin edge {frequency} Hz")]
    ZeroFiducial { detector: String, frequency: f64 },

    /// Shape mismatches or non-finite numerical results.
    #[error("Computation error: {0}")]
    Computation(String),

    /// The global minimizer could not produce a result.
    #[error("Optimizer error: {0}")]
    Optimizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelBinError {
    /// Process exit code reported by the `rb` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            RelBinError::Config(_) => 2,
            RelBinError::DegenerateFiducial(_)
            | RelBinError::GridLookup { .. }
            | RelBinError::ZeroFiducial { .. } => 3,
            RelBinError::Computation(_) | RelBinError::Optimizer(_) => 4,
            RelBinError::Io(_) | RelBinError::Json(_) => 5,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        RelBinError::Config(message.into())
    }

    pub(crate) fn computation(message: impl Into<String>) -> Self {
        RelBinError::Computation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_group_by_failure_kind() {
        assert_eq!(RelBinError::config("bad chi").exit_code(), 2);
        assert_eq!(
            RelBinError::ZeroFiducial {
                detector: "H1".to_string(),
                frequency: 20.0
            }
            .exit_code(),
            3
        );
        assert_eq!(RelBinError::computation("nan").exit_code(), 4);
    }

    #[test]
    fn grid_lookup_message_names_detector() {
        let err = RelBinError::GridLookup {
            detector: "L1".to_string(),
            frequency: 512.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("L1"), "{msg}");
        assert!(msg.contains("512"), "{msg}");
    }
}
