//! Interferometer data container.
//!
//! Holds the frequency grid, strain, PSD, and the usable band of one detector.
//! The usability mask is derived from the band, so clipping the maximum
//! frequency (after the fiducial waveform is known) shrinks the mask too.

use std::ops::Range;

use crate::detector::response::DetectorResponse;
use crate::domain::{ComplexSeries, Parameters};
use crate::error::{RelBinError, Result};
use crate::models::Polarizations;

#[derive(Debug)]
pub struct Interferometer {
    name: String,
    minimum_frequency: f64,
    maximum_frequency: f64,
    frequency_array: Vec<f64>,
    strain: ComplexSeries,
    psd: Vec<f64>,
    duration: f64,
    response: Box<dyn DetectorResponse>,
}

impl Interferometer {
    /// Build a detector with zero strain; use [`Interferometer::set_strain`]
    /// to attach data.
    pub fn new(
        name: impl Into<String>,
        frequency_array: Vec<f64>,
        psd: Vec<f64>,
        duration: f64,
        minimum_frequency: f64,
        maximum_frequency: f64,
        response: Box<dyn DetectorResponse>,
    ) -> Result<Self> {
        let name = name.into();
        if frequency_array.len() < 2 {
            return Err(RelBinError::config(format!(
                "{name}: frequency grid needs at least two samples."
            )));
        }
        if frequency_array.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(RelBinError::config(format!(
                "{name}: frequency grid must be strictly increasing."
            )));
        }
        if psd.len() != frequency_array.len() {
            return Err(RelBinError::config(format!(
                "{name}: PSD has {} samples, grid has {}.",
                psd.len(),
                frequency_array.len()
            )));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(RelBinError::config(format!(
                "{name}: duration must be finite and > 0."
            )));
        }
        if !(minimum_frequency.is_finite()
            && maximum_frequency.is_finite()
            && maximum_frequency > minimum_frequency)
        {
            return Err(RelBinError::config(format!(
                "{name}: invalid band [{minimum_frequency}, {maximum_frequency}] Hz."
            )));
        }

        let strain = ComplexSeries::zeros(frequency_array.len());
        let ifo = Self {
            name,
            minimum_frequency,
            maximum_frequency,
            frequency_array,
            strain,
            psd,
            duration,
            response,
        };

        let band = ifo.masked_range()?;
        if let Some(bad) = ifo.psd[band].iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(RelBinError::config(format!(
                "{}: PSD must be finite and > 0 inside the band (found {bad}).",
                ifo.name
            )));
        }
        Ok(ifo)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn minimum_frequency(&self) -> f64 {
        self.minimum_frequency
    }

    pub fn maximum_frequency(&self) -> f64 {
        self.maximum_frequency
    }

    pub fn frequency_array(&self) -> &[f64] {
        &self.frequency_array
    }

    pub fn strain(&self) -> &ComplexSeries {
        &self.strain
    }

    pub fn power_spectral_density(&self) -> &[f64] {
        &self.psd
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_strain(&mut self, strain: ComplexSeries) -> Result<()> {
        if strain.len() != self.frequency_array.len() {
            return Err(RelBinError::config(format!(
                "{}: strain has {} samples, grid has {}.",
                self.name,
                strain.len(),
                self.frequency_array.len()
            )));
        }
        self.strain = strain;
        Ok(())
    }

    /// Lower the maximum frequency to `cutoff` if it currently exceeds it.
    ///
    /// Returns `true` if the band changed.
    pub fn clip_maximum_frequency(&mut self, cutoff: f64) -> bool {
        if self.maximum_frequency > cutoff {
            self.maximum_frequency = cutoff;
            true
        } else {
            false
        }
    }

    /// Put back a maximum frequency saved before a clip.
    pub(crate) fn set_maximum_frequency(&mut self, maximum: f64) {
        self.maximum_frequency = maximum;
    }

    /// Contiguous index range of samples inside
    /// `[minimum_frequency, maximum_frequency]`.
    pub fn masked_range(&self) -> Result<Range<usize>> {
        let start = self
            .frequency_array
            .partition_point(|&f| f < self.minimum_frequency);
        let end = self
            .frequency_array
            .partition_point(|&f| f <= self.maximum_frequency);
        if end <= start {
            return Err(RelBinError::config(format!(
                "{}: no grid samples inside [{}, {}] Hz.",
                self.name, self.minimum_frequency, self.maximum_frequency
            )));
        }
        Ok(start..end)
    }

    /// Project polarizations through the detector.
    ///
    /// With `frequencies = None` the polarizations must be aligned with the
    /// full grid; otherwise with the given subset.
    pub fn get_detector_response(
        &self,
        polarizations: &Polarizations,
        parameters: &Parameters,
        frequencies: Option<&[f64]>,
    ) -> Result<ComplexSeries> {
        let frequencies = frequencies.unwrap_or(&self.frequency_array);
        self.response.project(polarizations, parameters, frequencies)
    }
}
