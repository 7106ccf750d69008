//! Density histogram and Gaussian PDF for the inverse-transform view.

use std::f64::consts::PI;

use crate::error::DomainError;

/// Equal-width bins over the sample range, normalised to unit area.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges.
    pub edges: Vec<f64>,
    /// Probability density per bin.
    pub density: Vec<f64>,
}

impl Histogram {
    /// Bin `samples` into `bins` equal-width bins (matplotlib `density=True`).
    pub fn density(samples: &[f64], bins: usize) -> Result<Self, DomainError> {
        if samples.is_empty() || bins == 0 {
            return Err(DomainError::EmptyHistogram);
        }
        // f64::min/max skip NaN, so check every sample before folding
        if !samples.iter().all(|s| s.is_finite()) {
            return Err(DomainError::NonFinite("histogram sample"));
        }
        let (mut lo, mut hi) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &s in samples {
            let bin = ((s - lo) / width) as usize;
            // the maximum sample lands in the last bin
            counts[bin.min(bins - 1)] += 1;
        }

        let norm = 1.0 / (samples.len() as f64 * width);
        Ok(Histogram {
            edges: (0..=bins).map(|i| lo + i as f64 * width).collect(),
            density: counts.iter().map(|&c| c as f64 * norm).collect(),
        })
    }

    /// Width shared by all bins.
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Centre of each bin.
    pub fn midpoints(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

/// Normal(mean, std_dev²) density at `x`.
pub fn gaussian_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let var = std_dev * std_dev;
    (-(x - mean).powi(2) / (2.0 * var)).exp() / (2.0 * PI * var).sqrt()
}
