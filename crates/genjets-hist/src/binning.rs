use genjets_core::errors::{ErrorInfo, GenjetsError};
use serde::{Deserialize, Serialize};

/// Largest number of regular bins a histogram may carry.
pub const MAX_BINS: usize = 1_000_000;

/// Regular bins of the jet pT histogram below the threshold offset.
const BASE_PT_BINS: usize = 1000;

/// Uniform binning of `[low, high)` into `bins` bins.
///
/// Bin indices follow the usual convention: `0` is the underflow bin,
/// `1..=bins` are the regular bins and `bins + 1` is the overflow bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Number of regular bins.
    pub bins: usize,
    /// Lower edge of the first regular bin.
    pub low: f64,
    /// Upper edge of the last regular bin.
    pub high: f64,
}

impl Binning {
    /// Creates a binning, rejecting empty or inverted ranges.
    pub fn new(bins: usize, low: f64, high: f64) -> Result<Self, GenjetsError> {
        if bins == 0 {
            return Err(GenjetsError::Histogram(
                ErrorInfo::new("invalid-binning", "at least one bin is required")
                    .with_context("bins", "0"),
            ));
        }
        if bins > MAX_BINS {
            return Err(too_many_bins(bins.to_string()));
        }
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(GenjetsError::Histogram(
                ErrorInfo::new("invalid-binning", "bin range must be finite with low < high")
                    .with_context("low", low.to_string())
                    .with_context("high", high.to_string()),
            ));
        }
        Ok(Self { bins, low, high })
    }

    /// Jet pT binning for a given threshold: `1000 + floor(pt_min)` bins
    /// over `[0, 100 + pt_min]`.
    pub fn for_pt_threshold(pt_min: f64) -> Result<Self, GenjetsError> {
        if !(pt_min.is_finite() && pt_min >= 0.0) {
            return Err(GenjetsError::Histogram(
                ErrorInfo::new("invalid-binning", "pT threshold must be non-negative")
                    .with_context("pt_min", pt_min.to_string()),
            ));
        }
        if pt_min.floor() > (MAX_BINS - BASE_PT_BINS) as f64 {
            return Err(too_many_bins(format!("{BASE_PT_BINS} + floor({pt_min})")));
        }
        Self::new(BASE_PT_BINS + pt_min.floor() as usize, 0.0, 100.0 + pt_min)
    }

    /// Width of every regular bin.
    pub fn width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Total number of bins including underflow and overflow.
    pub fn len_with_flow(&self) -> usize {
        self.bins + 2
    }

    /// Bin index holding `x`. NaN goes to the overflow bin.
    pub fn find_bin(&self, x: f64) -> usize {
        if x < self.low {
            return 0;
        }
        if !(x < self.high) {
            return self.bins + 1;
        }
        let idx = ((x - self.low) / self.width()).floor() as usize;
        idx.min(self.bins - 1) + 1
    }
}

fn too_many_bins(bins: String) -> GenjetsError {
    GenjetsError::Histogram(
        ErrorInfo::new("too-many-bins", format!("at most {MAX_BINS} bins are supported"))
            .with_context("bins", bins),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_layout() {
        let binning = Binning::for_pt_threshold(25.0).unwrap();
        assert_eq!(binning.bins, 1025);
        assert_eq!(binning.low, 0.0);
        assert_eq!(binning.high, 125.0);
        assert!((binning.width() - 125.0 / 1025.0).abs() < 1e-12);
    }

    #[test]
    fn fractional_threshold_is_floored() {
        let binning = Binning::for_pt_threshold(12.7).unwrap();
        assert_eq!(binning.bins, 1012);
        assert!((binning.high - 112.7).abs() < 1e-12);
    }

    #[test]
    fn flow_bins() {
        let binning = Binning::new(10, 0.0, 10.0).unwrap();
        assert_eq!(binning.find_bin(-0.1), 0);
        assert_eq!(binning.find_bin(0.0), 1);
        assert_eq!(binning.find_bin(9.999), 10);
        assert_eq!(binning.find_bin(10.0), 11);
        assert_eq!(binning.find_bin(f64::NAN), 11);
        assert_eq!(binning.find_bin(f64::INFINITY), 11);
        assert_eq!(binning.find_bin(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn rejects_degenerate_ranges() {
        assert!(Binning::new(0, 0.0, 1.0).is_err());
        assert!(Binning::new(5, 1.0, 1.0).is_err());
        assert!(Binning::new(5, 0.0, f64::NAN).is_err());
        assert!(Binning::for_pt_threshold(-1.0).is_err());
    }

    #[test]
    fn caps_the_bin_count() {
        assert_eq!(Binning::new(MAX_BINS, 0.0, 1.0).unwrap().bins, MAX_BINS);
        let err = Binning::new(MAX_BINS + 1, 0.0, 1.0).unwrap_err();
        assert_eq!(err.info().code, "too-many-bins");

        let largest = (MAX_BINS - BASE_PT_BINS) as f64;
        assert_eq!(Binning::for_pt_threshold(largest).unwrap().bins, MAX_BINS);
        for pt_min in [largest + 1.0, 1.0e20, f64::MAX] {
            let err = Binning::for_pt_threshold(pt_min).unwrap_err();
            assert!(matches!(err, GenjetsError::Histogram(_)));
            assert_eq!(err.info().code, "too-many-bins");
        }
    }
}
