//! Write run report JSON files.
//!
//! A run file records what was evaluated and what came out:
//! - the binning configuration and fiducial parameters
//! - per-detector bin edges
//! - per-detector SNR quantities and the likelihoods, when computed

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Parameters, RelativeBinningConfig};
use crate::error::Result;
use crate::likelihood::RelativeBinningLikelihood;
use crate::report::DetectorSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorBins {
    pub name: String,
    pub edges: Vec<f64>,
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluated {
    pub label: String,
    pub parameters: Parameters,
    pub detectors: Vec<DetectorSummary>,
    pub log_likelihood_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    pub tool: String,
    pub command: String,
    pub generated_at: DateTime<Utc>,
    pub config: RelativeBinningConfig,
    pub fiducial_parameters: Parameters,
    pub bins: Vec<DetectorBins>,
    pub noise_log_likelihood: Option<f64>,
    #[serde(default)]
    pub evaluations: Vec<Evaluated>,
}

impl RunFile {
    /// Snapshot of `likelihood`'s configuration, fiducial point, and bins.
    pub fn from_likelihood(command: &str, likelihood: &RelativeBinningLikelihood) -> Self {
        let bins = likelihood
            .detectors()
            .iter()
            .zip(likelihood.bins())
            .map(|(det, b)| DetectorBins {
                name: det.name().to_string(),
                edges: b.edges.clone(),
                indices: b.indices.clone(),
            })
            .collect();
        Self {
            tool: "rb".to_string(),
            command: command.to_string(),
            generated_at: Utc::now(),
            config: likelihood.config().clone(),
            fiducial_parameters: likelihood.fiducial_parameters().clone(),
            bins,
            noise_log_likelihood: None,
            evaluations: Vec::new(),
        }
    }
}

pub fn write_run_json(path: &Path, run: &RunFile) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, run)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back() {
        let run = RunFile {
            tool: "rb".to_string(),
            command: "bins".to_string(),
            generated_at: Utc::now(),
            config: RelativeBinningConfig::default(),
            fiducial_parameters: [("phase".to_string(), 0.25)].into(),
            bins: vec![DetectorBins {
                name: "H1".to_string(),
                edges: vec![20.0, 31.5, 64.0],
                indices: vec![80, 126, 256],
            }],
            noise_log_likelihood: Some(-12.5),
            evaluations: Vec::new(),
        };
        let path = std::env::temp_dir().join(format!("rb_run_{}.json", std::process::id()));
        write_run_json(&path, &run).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let back: RunFile = serde_json::from_str(&text).unwrap();
        assert_eq!(back, run);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let run = RunFile {
            tool: "rb".to_string(),
            command: "bins".to_string(),
            generated_at: Utc::now(),
            config: RelativeBinningConfig::default(),
            fiducial_parameters: Parameters::new(),
            bins: Vec::new(),
            noise_log_likelihood: None,
            evaluations: Vec::new(),
        };
        let err = write_run_json(Path::new("/nonexistent/rb/run.json"), &run).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
