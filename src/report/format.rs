//! Formatted terminal output.
//!
//! All formatting lives here so output changes stay local and the numerical
//! code never builds strings.

use crate::domain::{BinSet, Parameters};
use crate::report::DetectorSummary;

/// Bin plan of every detector: band, bin count, and the edges.
pub fn format_bin_plan(names: &[&str], bins: &[BinSet], show_edges: bool) -> String {
    let mut out = String::new();
    out.push_str("=== rb - relative binning plan ===\n");
    for (name, bin_set) in names.iter().zip(bins) {
        out.push_str(&format!(
            "{name}: {} bins over [{:.3}, {:.3}] Hz | widths [{:.3}, {:.3}] Hz\n",
            bin_set.len(),
            bin_set.first_edge(),
            bin_set.last_edge(),
            min(&bin_set.widths),
            max(&bin_set.widths),
        ));
        if show_edges {
            out.push_str(&format!("  edges: {}\n", fmt_vec(&bin_set.edges, 3)));
        }
    }
    out
}

/// Per-detector SNR table.
pub fn format_snr_table(title: &str, rows: &[DetectorSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));
    out.push_str(
        format!(
            "{:<6} {:>6} {:>14} {:>14} {:>14} {:>10}\n",
            "det", "bins", "Re(d|h)", "Im(d|h)", "(h|h)", "|rho|"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<6} {:-<14} {:-<14} {:-<14} {:-<10}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<6} {:>6} {:>14.4} {:>14.4} {:>14.4} {:>10.4}\n",
                truncate(&r.name, 6),
                r.n_bins,
                r.d_inner_h[0],
                r.d_inner_h[1],
                r.optimal_snr_squared,
                r.matched_filter_snr,
            )
            .trim_end(),
        );
        out.push('\n');
        if let Some(len) = r.time_series_len {
            out.push_str(&format!("       time-shift series: {len} samples\n"));
        }
    }
    out
}

pub fn format_likelihoods(log_likelihood_ratio: f64, noise_log_likelihood: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!("ln L/L_noise = {log_likelihood_ratio:.6}\n"));
    out.push_str(&format!("ln L_noise   = {noise_log_likelihood:.6}\n"));
    out.push_str(&format!(
        "ln L         = {:.6}\n",
        log_likelihood_ratio + noise_log_likelihood
    ));
    out
}

pub fn format_parameters(title: &str, parameters: &Parameters) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));
    for (name, value) in parameters {
        out.push_str(&format!("- {name:<14} {value:.8}\n"));
    }
    out
}

fn min(v: &[f64]) -> f64 {
    v.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(v: &[f64]) -> f64 {
    v.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn fmt_vec(v: &[f64], precision: usize) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.precision$}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
