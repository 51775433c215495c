//! Tunable settings for the relative-binning likelihood.
//!
//! Defaults follow the usual choices for the binning scheme (`chi = 1`,
//! `epsilon = 0.5`). Values can be overridden from the environment (and a
//! `.env` file) so scripted runs do not need code changes.
//!
//! Loading only parses. Callers apply any further overrides and then call
//! [`RelativeBinningConfig::validate`]; the likelihood constructor validates
//! as well.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RelBinError, Result};

pub const ENV_CHI: &str = "RB_CHI";
pub const ENV_EPSILON: &str = "RB_EPSILON";
pub const ENV_TIME_MARGINALIZATION: &str = "RB_TIME_MARGINALIZATION";
pub const ENV_OPTIMIZER_ROUNDS: &str = "RB_OPTIMIZER_ROUNDS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeBinningConfig {
    /// Limit on the perturbation of each post-Newtonian phase coefficient.
    pub chi: f64,
    /// Phase-error budget per bin (radians).
    pub epsilon: f64,
    /// Produce the per-time-shift `(d|h)` series for time marginalization.
    pub time_marginalization: bool,
    /// Search for a better fiducial point at construction.
    pub update_fiducial_parameters: bool,
    /// Number of minimize/refresh rounds when searching for the fiducial point.
    pub optimizer_rounds: usize,
}

impl Default for RelativeBinningConfig {
    fn default() -> Self {
        Self {
            chi: 1.0,
            epsilon: 0.5,
            time_marginalization: false,
            update_fiducial_parameters: false,
            optimizer_rounds: 1,
        }
    }
}

impl RelativeBinningConfig {
    /// Load `.env` (if present) and apply `RB_*` overrides to the defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Values are parsed, not
    /// validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var::<f64, _>(&lookup, ENV_CHI)? {
            config.chi = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, ENV_EPSILON)? {
            config.epsilon = v;
        }
        if let Some(v) = parse_var::<bool, _>(&lookup, ENV_TIME_MARGINALIZATION)? {
            config.time_marginalization = v;
        }
        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_OPTIMIZER_ROUNDS)? {
            config.optimizer_rounds = v;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.chi.is_finite() && self.chi > 0.0) {
            return Err(RelBinError::config(format!(
                "chi must be finite and > 0 (got {}).",
                self.chi
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(RelBinError::config(format!(
                "epsilon must be finite and > 0 (got {}).",
                self.epsilon
            )));
        }
        if self.optimizer_rounds == 0 {
            return Err(RelBinError::config("optimizer_rounds must be >= 1."));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| RelBinError::config(format!("Invalid {key}='{raw}': {e}")))
}
