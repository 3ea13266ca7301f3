use genjets_core::errors::{ErrorInfo, GenjetsError};
use serde::{Deserialize, Serialize};

use crate::binning::Binning;

/// Weighted one-dimensional histogram with fixed binning.
///
/// Per-bin vectors have `binning.bins + 2` entries, underflow first and
/// overflow last. Fills only ever add; nothing is reset during a run.
/// Mean and standard deviation use the in-range fills only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    /// Histogram name, used as the key in the output document.
    pub name: String,
    /// Axis title.
    pub title: String,
    /// Bin layout, fixed at creation.
    pub binning: Binning,
    /// Unweighted fill count per bin.
    pub counts: Vec<u64>,
    /// Sum of weights per bin.
    pub sumw: Vec<f64>,
    /// Sum of squared weights per bin.
    pub sumw2: Vec<f64>,
    /// Total number of fills, including under- and overflow.
    pub entries: u64,
    tsumw: f64,
    tsumwx: f64,
    tsumwx2: f64,
}

impl Histogram1D {
    /// Creates an empty histogram.
    pub fn new(name: impl Into<String>, title: impl Into<String>, binning: Binning) -> Self {
        let len = binning.len_with_flow();
        Self {
            name: name.into(),
            title: title.into(),
            binning,
            counts: vec![0; len],
            sumw: vec![0.0; len],
            sumw2: vec![0.0; len],
            entries: 0,
            tsumw: 0.0,
            tsumwx: 0.0,
            tsumwx2: 0.0,
        }
    }

    /// Adds one entry at `x` with weight `weight`; returns the bin index.
    pub fn fill(&mut self, x: f64, weight: f64) -> usize {
        let bin = self.binning.find_bin(x);
        self.counts[bin] += 1;
        self.sumw[bin] += weight;
        self.sumw2[bin] += weight * weight;
        self.entries += 1;
        if bin != 0 && bin != self.binning.bins + 1 {
            self.tsumw += weight;
            self.tsumwx += weight * x;
            self.tsumwx2 += weight * x * x;
        }
        bin
    }

    /// Sum of weights in `bin`.
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.sumw.get(bin).copied().unwrap_or(0.0)
    }

    /// Statistical error `sqrt(Σw²)` of `bin`.
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2.get(bin).copied().unwrap_or(0.0).sqrt()
    }

    /// Unweighted fill count of `bin`.
    pub fn bin_count(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Underflow weight.
    pub fn underflow(&self) -> f64 {
        self.sumw[0]
    }

    /// Overflow weight.
    pub fn overflow(&self) -> f64 {
        self.sumw[self.binning.bins + 1]
    }

    /// Sum of weights over the regular bins.
    pub fn integral(&self) -> f64 {
        self.sumw[1..=self.binning.bins].iter().sum()
    }

    /// Sum of weights over every bin, under- and overflow included.
    pub fn total_weight(&self) -> f64 {
        self.sumw.iter().sum()
    }

    /// Unweighted fill count over every bin.
    pub fn total_counts(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Weighted mean of the in-range fills; zero when there are none.
    pub fn mean(&self) -> f64 {
        if self.tsumw == 0.0 {
            return 0.0;
        }
        self.tsumwx / self.tsumw
    }

    /// Weighted standard deviation of the in-range fills.
    pub fn std_dev(&self) -> f64 {
        if self.tsumw == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.tsumwx2 / self.tsumw - mean * mean).max(0.0).sqrt()
    }

    /// Adds `other` bin by bin. Both histograms must share the binning.
    pub fn merge(&mut self, other: &Histogram1D) -> Result<(), GenjetsError> {
        if self.binning != other.binning {
            return Err(GenjetsError::Histogram(
                ErrorInfo::new("binning-mismatch", "histograms with different binning cannot be merged")
                    .with_context("left", format!("{:?}", self.binning))
                    .with_context("right", format!("{:?}", other.binning)),
            ));
        }
        for (dst, src) in self.counts.iter_mut().zip(&other.counts) {
            *dst += src;
        }
        for (dst, src) in self.sumw.iter_mut().zip(&other.sumw) {
            *dst += src;
        }
        for (dst, src) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *dst += src;
        }
        self.entries += other.entries;
        self.tsumw += other.tsumw;
        self.tsumwx += other.tsumwx;
        self.tsumwx2 += other.tsumwx2;
        Ok(())
    }

    /// Whether nothing has been filled yet.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}
