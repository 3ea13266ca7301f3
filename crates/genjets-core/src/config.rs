//! Physics and seeding configuration fixed once per run.

use serde::{Deserialize, Serialize};

use crate::errors::GenjetsError;

/// Collision setup shared by event generation and jet clustering.
///
/// `pt_hat_min` is both the lower bound on the hard-process transverse
/// momentum and the jet acceptance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Centre-of-mass collision energy in GeV.
    #[serde(default = "default_collision_energy")]
    pub collision_energy: f64,
    /// Lower bound on the hard-process transverse momentum in GeV.
    #[serde(default = "default_pt_hat_min")]
    pub pt_hat_min: f64,
    /// Parton distribution function set identifier.
    #[serde(default = "default_pdf_set")]
    pub pdf_set: String,
}

fn default_collision_energy() -> f64 {
    7000.0
}

fn default_pt_hat_min() -> f64 {
    25.0
}

fn default_pdf_set() -> String {
    "LHAPDF6:NNPDF31_lo_as_0118".to_string()
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            collision_energy: default_collision_energy(),
            pt_hat_min: default_pt_hat_min(),
            pdf_set: default_pdf_set(),
        }
    }
}

impl PhysicsConfig {
    /// Checks that the collision can produce hard processes above threshold.
    pub fn validate(&self) -> Result<(), GenjetsError> {
        if !self.collision_energy.is_finite() || self.collision_energy <= 0.0 {
            return Err(GenjetsError::invalid_config(
                "physics.collision_energy",
                self.collision_energy,
                "collision energy must be a positive number of GeV",
            ));
        }
        if !self.pt_hat_min.is_finite() || self.pt_hat_min <= 0.0 {
            return Err(GenjetsError::invalid_config(
                "physics.pt_hat_min",
                self.pt_hat_min,
                "pT-hat minimum must be a positive number of GeV",
            ));
        }
        if 2.0 * self.pt_hat_min >= self.collision_energy {
            return Err(GenjetsError::invalid_config(
                "physics.pt_hat_min",
                self.pt_hat_min,
                "pT-hat minimum is kinematically out of reach at this collision energy",
            ));
        }
        if self.pdf_set.trim().is_empty() {
            return Err(GenjetsError::invalid_config(
                "physics.pdf_set",
                &self.pdf_set,
                "PDF set identifier must not be empty",
            ));
        }
        Ok(())
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in the run log.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}
