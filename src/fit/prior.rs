//! Priors, bounds, and the mapping between parameter maps and vectors.
//!
//! Only the pieces the fiducial search needs: which parameters are free
//! (neither fixed nor a constraint), and their search ranges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Parameters;
use crate::error::{RelBinError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prior {
    Uniform { minimum: f64, maximum: f64 },
    /// Fixed parameter.
    DeltaFunction { peak: f64 },
    /// Constraint on derived quantities; never sampled directly.
    Constraint { minimum: f64, maximum: f64 },
}

impl Prior {
    pub fn is_free(&self) -> bool {
        matches!(self, Prior::Uniform { .. })
    }

    pub fn minimum(&self) -> f64 {
        match *self {
            Prior::Uniform { minimum, .. } | Prior::Constraint { minimum, .. } => minimum,
            Prior::DeltaFunction { peak } => peak,
        }
    }

    pub fn maximum(&self) -> f64 {
        match *self {
            Prior::Uniform { maximum, .. } | Prior::Constraint { maximum, .. } => maximum,
            Prior::DeltaFunction { peak } => peak,
        }
    }
}

pub type PriorDict = BTreeMap<String, Prior>;

/// Closed search interval for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(name: &str, lower: f64, upper: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite()) {
            return Err(RelBinError::config(format!(
                "Bounds for '{name}' must be finite (got [{lower}, {upper}])."
            )));
        }
        if !(upper > lower) {
            return Err(RelBinError::config(format!(
                "Bounds for '{name}' are empty or degenerate: [{lower}, {upper}]."
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Names of parameters whose prior is neither fixed nor a constraint.
pub fn free_parameters(priors: &PriorDict) -> Vec<String> {
    priors
        .iter()
        .filter(|(_, p)| p.is_free())
        .map(|(k, _)| k.clone())
        .collect()
}

pub fn bounds_from_priors(priors: &PriorDict, names: &[String]) -> Result<Vec<Bounds>> {
    names
        .iter()
        .map(|name| {
            let prior = priors
                .get(name)
                .ok_or_else(|| RelBinError::config(format!("No prior for '{name}'.")))?;
            Bounds::new(name, prior.minimum(), prior.maximum())
        })
        .collect()
}

pub fn bounds_from_map(map: &BTreeMap<String, (f64, f64)>, names: &[String]) -> Result<Vec<Bounds>> {
    names
        .iter()
        .map(|name| {
            let (lower, upper) = map
                .get(name)
                .copied()
                .ok_or_else(|| RelBinError::config(format!("No bounds given for '{name}'.")))?;
            Bounds::new(name, lower, upper)
        })
        .collect()
}

/// Converts between search vectors over the free parameters and full
/// parameter maps (fixed entries taken from a base map).
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMapping {
    names: Vec<String>,
}

impl ParameterMapping {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn to_parameters(&self, values: &[f64], base: &Parameters) -> Parameters {
        let mut out = base.clone();
        for (name, &v) in self.names.iter().zip(values.iter()) {
            out.insert(name.clone(), v);
        }
        out
    }

    pub fn to_vector(&self, parameters: &Parameters) -> Result<Vec<f64>> {
        self.names
            .iter()
            .map(|name| {
                parameters
                    .get(name)
                    .copied()
                    .ok_or_else(|| RelBinError::config(format!("Missing parameter '{name}'.")))
            })
            .collect()
    }
}
