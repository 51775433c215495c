//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - initializes logging
//! - parses CLI arguments
//! - runs the selected pipeline
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, EvaluateArgs, OptimizeArgs, SignalArgs};
use crate::error::Result;
use crate::io::{write_bins_csv, write_run_json, RunFile};
use crate::likelihood::RelativeBinningLikelihood;
use crate::report::{format_bin_plan, format_likelihoods, format_parameters, format_snr_table};

pub mod pipeline;

/// Entry point for the `rb` binary.
pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()
        .ok();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Bins(args) => handle_bins(args),
        Command::Evaluate(args) => handle_evaluate(args),
        Command::Optimize(args) => handle_optimize(args),
    }
}

fn handle_bins(args: SignalArgs) -> Result<()> {
    let likelihood = pipeline::run_bins(&args)?;
    println!("{}", bin_plan(&likelihood, true));

    let run = RunFile::from_likelihood("bins", &likelihood);
    export(&args, &likelihood, run)
}

fn handle_evaluate(args: EvaluateArgs) -> Result<()> {
    let out = pipeline::run_evaluate(&args)?;
    println!("{}", bin_plan(&out.likelihood, false));
    for evaluated in &out.evaluations {
        println!("{}", format_snr_table(&evaluated.label, &evaluated.detectors));
        println!(
            "{}",
            format_likelihoods(evaluated.log_likelihood_ratio, out.noise_log_likelihood)
        );
    }

    let mut run = RunFile::from_likelihood("evaluate", &out.likelihood);
    run.noise_log_likelihood = Some(out.noise_log_likelihood);
    run.evaluations = out.evaluations;
    export(&args.signal, &out.likelihood, run)
}

fn handle_optimize(args: OptimizeArgs) -> Result<()> {
    let out = pipeline::run_optimize(&args)?;
    println!("{}", format_parameters("Starting fiducial point", &out.start));
    println!(
        "{}",
        format_parameters("Optimized fiducial point", out.likelihood.fiducial_parameters())
    );
    println!("{}", format_parameters("Injection", &out.injection));
    for evaluated in &out.evaluations {
        println!("{}", format_snr_table(&evaluated.label, &evaluated.detectors));
        println!("ln L/L_noise = {:.6}\n", evaluated.log_likelihood_ratio);
    }

    let mut run = RunFile::from_likelihood("optimize", &out.likelihood);
    run.evaluations = out.evaluations;
    export(&args.signal, &out.likelihood, run)
}

fn bin_plan(likelihood: &RelativeBinningLikelihood, show_edges: bool) -> String {
    let names: Vec<&str> = likelihood.detectors().iter().map(|d| d.name()).collect();
    format_bin_plan(&names, likelihood.bins(), show_edges)
}

fn export(args: &SignalArgs, likelihood: &RelativeBinningLikelihood, run: RunFile) -> Result<()> {
    if let Some(path) = &args.export {
        write_run_json(path, &run)?;
        log::info!("Wrote run report to {}", path.display());
    }
    if let Some(path) = &args.export_bins {
        let names: Vec<&str> = likelihood.detectors().iter().map(|d| d.name()).collect();
        write_bins_csv(path, &names, likelihood.bins())?;
        log::info!("Wrote bin plan to {}", path.display());
    }
    Ok(())
}
