//! Command-line parsing for the `rb` binary.
//!
//! Argument parsing and command dispatch are kept apart from the likelihood
//! code; everything here is a plain clap description of the options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rb",
    version,
    about = "Relative-binning likelihood for compact-binary signals (synthetic network)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan frequency bins for the fiducial signal and print them.
    Bins(SignalArgs),
    /// Evaluate SNRs and likelihoods at the injection and at an offset point.
    Evaluate(EvaluateArgs),
    /// Search for a better fiducial point starting from a perturbed one.
    Optimize(OptimizeArgs),
}

/// Synthetic network, injected signal, and binning options.
#[derive(Debug, Args, Clone)]
pub struct SignalArgs {
    /// Segment duration (s).
    #[arg(long, default_value_t = 4.0)]
    pub duration: f64,

    /// Number of frequency samples (grid spacing is 1/duration).
    #[arg(long, default_value_t = 4096)]
    pub samples: usize,

    /// Lower edge of the analysis band (Hz).
    #[arg(long, default_value_t = 20.0)]
    pub f_min: f64,

    /// Upper edge of the analysis band (Hz).
    #[arg(long, default_value_t = 128.0)]
    pub f_max: f64,

    /// Flat PSD level for every detector.
    #[arg(long, default_value_t = 1e-3)]
    pub psd: f64,

    /// Injected chirp mass (solar masses).
    #[arg(long, default_value_t = 10.0)]
    pub chirp_mass: f64,

    /// Injected mass ratio (0 < q <= 1).
    #[arg(long, default_value_t = 0.8)]
    pub mass_ratio: f64,

    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// Coalescence phase (rad).
    #[arg(long, default_value_t = 0.0)]
    pub phase: f64,

    /// Inclination (rad).
    #[arg(long, default_value_t = 0.4)]
    pub theta_jn: f64,

    /// Seed for Gaussian noise; omit for a noiseless injection.
    #[arg(long)]
    pub noise_seed: Option<u64>,

    /// Phase-coefficient perturbation limit (overrides RB_CHI).
    #[arg(long)]
    pub chi: Option<f64>,

    /// Per-bin phase error budget in radians (overrides RB_EPSILON).
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Also compute the per-time-shift (d|h) series.
    #[arg(long, default_value_t = false)]
    pub time_marginalization: bool,

    /// Write a JSON run report to this path.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write the bin plan as CSV to this path.
    #[arg(long)]
    pub export_bins: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub signal: SignalArgs,

    /// Relative chirp-mass offset of the second evaluation point.
    #[arg(long, default_value_t = 1e-3)]
    pub offset: f64,
}

#[derive(Debug, Args, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub signal: SignalArgs,

    /// Phase offset (rad) of the starting fiducial point.
    #[arg(long, default_value_t = 0.5)]
    pub phase_offset: f64,

    /// Relative amplitude offset of the starting fiducial point.
    #[arg(long, default_value_t = 0.2)]
    pub amplitude_offset: f64,

    /// Minimize/refresh rounds (overrides RB_OPTIMIZER_ROUNDS).
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Differential-evolution population size per free parameter.
    #[arg(long, default_value_t = 15)]
    pub population: usize,

    /// Differential-evolution generation limit.
    #[arg(long, default_value_t = 100)]
    pub generations: usize,

    /// Differential-evolution seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
