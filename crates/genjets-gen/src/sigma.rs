use genjets_core::errors::{ErrorInfo, GenjetsError};
use serde::{Deserialize, Serialize};

/// Hit-or-miss cross-section estimate accumulated over generator trials.
///
/// Every trial drawn from the phase-space envelope increments `trials`;
/// accepted trials add their event weight. The estimate is
/// `sigma_max_mb * sum_weights / trials` and is zero before the first trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Envelope cross section in millibarn.
    pub sigma_max_mb: f64,
    /// Number of trials drawn.
    pub trials: u64,
    /// Number of trials accepted as events.
    pub accepted: u64,
    /// Sum of accepted event weights.
    pub sum_weights: f64,
    /// Sum of squared accepted event weights.
    pub sum_weights2: f64,
}

impl CrossSection {
    /// Creates an empty estimate for the given envelope.
    pub fn new(sigma_max_mb: f64) -> Self {
        Self {
            sigma_max_mb,
            trials: 0,
            accepted: 0,
            sum_weights: 0.0,
            sum_weights2: 0.0,
        }
    }

    /// Counts one trial.
    pub fn record_trial(&mut self) {
        self.trials += 1;
    }

    /// Counts one accepted trial with its event weight.
    pub fn record_accepted(&mut self, weight: f64) {
        self.accepted += 1;
        self.sum_weights += weight;
        self.sum_weights2 += weight * weight;
    }

    /// Estimated generated cross section in millibarn.
    pub fn sigma_gen(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.sigma_max_mb * self.sum_weights / self.trials as f64
    }

    /// Statistical uncertainty on [`CrossSection::sigma_gen`] in millibarn.
    pub fn sigma_err(&self) -> f64 {
        if self.trials < 2 {
            return 0.0;
        }
        let n = self.trials as f64;
        let mean = self.sum_weights / n;
        let variance = (self.sum_weights2 / n - mean * mean).max(0.0);
        self.sigma_max_mb * (variance / n).sqrt()
    }

    /// Adds the counters of an estimate built on the same envelope.
    pub fn merge(&mut self, other: &CrossSection) -> Result<(), GenjetsError> {
        let scale = self.sigma_max_mb.abs().max(other.sigma_max_mb.abs());
        if (self.sigma_max_mb - other.sigma_max_mb).abs() > 1e-12 * scale {
            return Err(GenjetsError::Generation(
                ErrorInfo::new(
                    "sigma-envelope-mismatch",
                    "cross sections from different phase-space envelopes cannot be merged",
                )
                .with_context("left", self.sigma_max_mb.to_string())
                .with_context("right", other.sigma_max_mb.to_string()),
            ));
        }
        self.trials += other.trials;
        self.accepted += other.accepted;
        self.sum_weights += other.sum_weights;
        self.sum_weights2 += other.sum_weights2;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_estimate_is_zero() {
        let sigma = CrossSection::new(0.3);
        assert_eq!(sigma.sigma_gen(), 0.0);
        assert_eq!(sigma.sigma_err(), 0.0);
    }

    #[test]
    fn estimate_scales_acceptance() {
        let mut sigma = CrossSection::new(2.0);
        for idx in 0..4 {
            sigma.record_trial();
            if idx % 2 == 0 {
                sigma.record_accepted(1.0);
            }
        }
        assert_eq!(sigma.accepted, 2);
        assert!((sigma.sigma_gen() - 1.0).abs() < 1e-12);
        assert!(sigma.sigma_err() > 0.0);
    }

    #[test]
    fn merge_rejects_different_envelopes() {
        let mut left = CrossSection::new(1.0);
        let right = CrossSection::new(2.0);
        assert!(left.merge(&right).is_err());
    }

    #[test]
    fn merge_adds_counters() {
        let mut left = CrossSection::new(1.0);
        left.record_trial();
        left.record_accepted(0.5);
        let mut right = CrossSection::new(1.0);
        right.record_trial();
        right.record_trial();
        left.merge(&right).unwrap();
        assert_eq!(left.trials, 3);
        assert_eq!(left.accepted, 1);
        assert!((left.sigma_gen() - 0.5 / 3.0).abs() < 1e-12);
    }
}
