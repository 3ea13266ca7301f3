use std::fs;
use std::path::{Path, PathBuf};

use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_core::{PhysicsConfig, SeedPolicy};
use genjets_gen::{HardQcdSettings, PdfSet};
use genjets_hist::Binning;
use genjets_jets::{JetAlgorithm, JetDefinition};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// YAML-configurable parameters of a run.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Collision energy, pT-hat threshold and PDF set.
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Jet algorithm and radius.
    #[serde(default)]
    pub jets: JetsConfig,
    /// Generator tuning.
    #[serde(default)]
    pub generator: HardQcdSettings,
    /// Master seed.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output location and histogram naming.
    #[serde(default)]
    pub output: OutputConfig,
    /// Number of worker threads; `1` runs the plain sequential loop.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            jets: JetsConfig::default(),
            generator: HardQcdSettings::default(),
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
            workers: default_workers(),
        }
    }
}

/// Jet clustering settings. The pT threshold is always the physics pT-hat minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JetsConfig {
    /// Clustering algorithm.
    #[serde(default)]
    pub algorithm: JetAlgorithm,
    /// Distance parameter `R`.
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_radius() -> f64 {
    0.4
}

impl Default for JetsConfig {
    fn default() -> Self {
        Self {
            algorithm: JetAlgorithm::default(),
            radius: default_radius(),
        }
    }
}

/// Output document settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON document.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Name of the jet pT histogram.
    #[serde(default = "default_histogram_name")]
    pub histogram_name: String,
    /// Title of the jet pT histogram.
    #[serde(default = "default_histogram_title")]
    pub histogram_title: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/basic_pythia.json")
}

fn default_histogram_name() -> String {
    "Jet pT".to_string()
}

fn default_histogram_title() -> String {
    "N(p_{T})".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            histogram_name: default_histogram_name(),
            histogram_title: default_histogram_title(),
        }
    }
}

impl RunConfig {
    /// Reads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, GenjetsError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            GenjetsError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let config = Self::from_yaml(&contents).map_err(|err| match err {
            GenjetsError::Config(info) => {
                GenjetsError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })?;
        Ok(config)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, GenjetsError> {
        let config: RunConfig = if contents.trim().is_empty() {
            RunConfig::default()
        } else {
            serde_yaml::from_str(contents).map_err(|err| {
                GenjetsError::Config(ErrorInfo::new("config-parse", err.to_string()))
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), GenjetsError> {
        self.physics.validate()?;
        PdfSet::parse(&self.physics.pdf_set)?;
        self.generator.validate()?;
        self.jet_definition()?;
        self.binning()?;
        if self.workers == 0 {
            return Err(GenjetsError::invalid_config(
                "workers",
                self.workers,
                "at least one worker is required",
            ));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(GenjetsError::invalid_config(
                "output.path",
                "",
                "output path must not be empty",
            ));
        }
        if self.output.histogram_name.trim().is_empty() {
            return Err(GenjetsError::invalid_config(
                "output.histogram_name",
                &self.output.histogram_name,
                "histogram name must not be empty",
            ));
        }
        Ok(())
    }

    /// Jet definition with the pT-hat minimum as its threshold.
    pub fn jet_definition(&self) -> Result<JetDefinition, GenjetsError> {
        JetDefinition::new(self.jets.algorithm, self.jets.radius, self.physics.pt_hat_min)
    }

    /// Jet pT histogram binning derived from the pT-hat minimum.
    pub fn binning(&self) -> Result<Binning, GenjetsError> {
        Binning::for_pt_threshold(self.physics.pt_hat_min)
    }

    /// SHA-256 of the canonical JSON form, hex encoded.
    pub fn input_hash(&self) -> Result<String, GenjetsError> {
        let bytes = serde_json::to_vec(self).map_err(|err| {
            GenjetsError::Serde(ErrorInfo::new("config-serialize", err.to_string()))
        })?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
