use std::fmt;

use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_core::FourMomentum;
use jetty::{anti_kt_f, cambridge_aachen_f, kt_f, Cluster, PseudoJet};
use serde::{Deserialize, Serialize};

/// Sequential-recombination jet algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JetAlgorithm {
    /// The anti-kt algorithm.
    #[default]
    AntiKt,
    /// The kt algorithm.
    Kt,
    /// The Cambridge/Aachen algorithm.
    CambridgeAachen,
}

impl fmt::Display for JetAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JetAlgorithm::AntiKt => "anti-kt",
            JetAlgorithm::Kt => "kt",
            JetAlgorithm::CambridgeAachen => "cambridge-aachen",
        };
        f.write_str(name)
    }
}

/// A reconstructed jet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JetCandidate {
    /// Jet four-momentum.
    pub momentum: FourMomentum,
    /// Transverse momentum of `momentum`.
    pub pt: f64,
}

impl JetCandidate {
    /// Wraps a four-momentum, caching its transverse momentum.
    pub fn new(momentum: FourMomentum) -> Self {
        Self {
            pt: momentum.pt(),
            momentum,
        }
    }
}

/// Anything that turns a particle list into inclusive jets.
pub trait JetFinder {
    /// Clusters `particles` and returns the jets passing the transverse
    /// momentum threshold, hardest first. Empty input yields no jets.
    fn inclusive_jets(&self, particles: &[FourMomentum]) -> Vec<JetCandidate>;
}

impl<F: JetFinder + ?Sized> JetFinder for &F {
    fn inclusive_jets(&self, particles: &[FourMomentum]) -> Vec<JetCandidate> {
        (**self).inclusive_jets(particles)
    }
}

/// Jet algorithm, distance parameter and transverse momentum threshold,
/// fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JetDefinition {
    /// Jet algorithm.
    pub algorithm: JetAlgorithm,
    /// Distance parameter `R`.
    pub radius: f64,
    /// Minimum jet transverse momentum in GeV; jets with `pt >= min_pt` are kept.
    pub min_pt: f64,
}

impl JetDefinition {
    /// Creates a validated jet definition.
    pub fn new(algorithm: JetAlgorithm, radius: f64, min_pt: f64) -> Result<Self, GenjetsError> {
        let definition = Self {
            algorithm,
            radius,
            min_pt,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Checks the radius and threshold.
    pub fn validate(&self) -> Result<(), GenjetsError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GenjetsError::Clustering(
                ErrorInfo::new("invalid-jet-radius", "jet radius must be positive and finite")
                    .with_context("radius", self.radius.to_string()),
            ));
        }
        if !(self.min_pt.is_finite() && self.min_pt >= 0.0) {
            return Err(GenjetsError::Clustering(
                ErrorInfo::new("invalid-jet-threshold", "jet pT threshold must be non-negative")
                    .with_context("min_pt", self.min_pt.to_string()),
            ));
        }
        Ok(())
    }

    fn cluster(&self, particles: Vec<PseudoJet>) -> Vec<PseudoJet> {
        let minpt2 = self.min_pt * self.min_pt;
        let cut = |jet: PseudoJet| jet.pt2() >= minpt2;
        let r = self.radius;
        match self.algorithm {
            JetAlgorithm::AntiKt => particles.cluster_if(anti_kt_f(r), cut),
            JetAlgorithm::Kt => particles.cluster_if(kt_f(r), cut),
            JetAlgorithm::CambridgeAachen => particles.cluster_if(cambridge_aachen_f(r), cut),
        }
    }
}

impl JetFinder for JetDefinition {
    fn inclusive_jets(&self, particles: &[FourMomentum]) -> Vec<JetCandidate> {
        if particles.is_empty() {
            return Vec::new();
        }
        let pseudojets: Vec<PseudoJet> = particles
            .iter()
            .map(|p| [p.e, p.px, p.py, p.pz].into())
            .collect();
        let mut jets: Vec<JetCandidate> = self
            .cluster(pseudojets)
            .into_iter()
            .map(|jet| {
                JetCandidate::new(FourMomentum::new(
                    f64::from(jet.px()),
                    f64::from(jet.py()),
                    f64::from(jet.pz()),
                    f64::from(jet.e()),
                ))
            })
            .collect();
        jets.sort_by(|a, b| b.pt.total_cmp(&a.pt));
        log::trace!(
            "{} clustered {} particles into {} jets",
            self.algorithm,
            particles.len(),
            jets.len()
        );
        jets
    }
}
