//! Export the bin plan to CSV.
//!
//! One row per bin and detector, easy to load in spreadsheets or plotting
//! scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::BinSet;
use crate::error::{RelBinError, Result};

/// Write `detector,bin,f_low,f_high,index_low,index_high,width,center` rows.
pub fn write_bins_csv(path: &Path, names: &[&str], bins: &[BinSet]) -> Result<()> {
    if names.len() != bins.len() {
        return Err(RelBinError::computation(format!(
            "{} detector names for {} bin sets.",
            names.len(),
            bins.len()
        )));
    }
    let mut file = BufWriter::new(File::create(path)?);
    write_bins(&mut file, names, bins)?;
    file.flush()?;
    Ok(())
}

fn write_bins<W: Write>(out: &mut W, names: &[&str], bins: &[BinSet]) -> Result<()> {
    writeln!(out, "detector,bin,f_low,f_high,index_low,index_high,width,center")?;
    for (name, bin_set) in names.iter().zip(bins) {
        for i in 0..bin_set.len() {
            writeln!(
                out,
                "{},{},{:.10},{:.10},{},{},{:.10},{:.10}",
                name,
                i,
                bin_set.edges[i],
                bin_set.edges[i + 1],
                bin_set.indices[i],
                bin_set.indices[i + 1],
                bin_set.widths[i],
                bin_set.centers[i],
            )?;
        }
    }
    Ok(())
}
