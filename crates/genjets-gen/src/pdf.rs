use std::fmt;

use genjets_core::errors::{ErrorInfo, GenjetsError};
use serde::{Deserialize, Serialize};

/// Origin of a PDF set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfProvider {
    /// Set addressed through an `LHAPDF6:<name>` identifier.
    Lhapdf6,
    /// Set addressed by its built-in integer code.
    Builtin,
}

/// `(name, LHAPDF id, large-x power)` for the supported LHAPDF6 sets.
const LHAPDF6_SETS: &[(&str, u32, f64)] = &[
    ("NNPDF31_lo_as_0118", 315_000, 5.0),
    ("CT14lo", 13_200, 4.6),
    ("MSTW2008lo68cl", 21_000, 5.3),
];

/// `(code, name, large-x power)` for the built-in sets.
const BUILTIN_SETS: &[(u32, &str, f64)] = &[(8, "CTEQ6L1", 4.8), (13, "NNPDF2.3 QCD+QED LO", 5.1)];

/// A resolved parton distribution function set.
///
/// Only the large-x falloff of the set is used: the parton luminosity shape
/// `L(x) = (1 - x)^large_x_power` drives the acceptance of hard-process
/// trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfSet {
    /// Identifier as configured.
    pub identifier: String,
    /// Provider the identifier refers to.
    pub provider: PdfProvider,
    /// Human readable set name.
    pub name: String,
    /// LHAPDF numeric id, when the set has one.
    pub lhapdf_id: Option<u32>,
    /// Exponent of the `(1 - x)` falloff.
    pub large_x_power: f64,
}

impl PdfSet {
    /// Resolves an identifier such as `LHAPDF6:NNPDF31_lo_as_0118` or `13`.
    pub fn parse(identifier: &str) -> Result<Self, GenjetsError> {
        let trimmed = identifier.trim();
        if let Some(name) = trimmed.strip_prefix("LHAPDF6:") {
            return LHAPDF6_SETS
                .iter()
                .find(|(known, _, _)| *known == name)
                .map(|&(known, id, power)| PdfSet {
                    identifier: trimmed.to_string(),
                    provider: PdfProvider::Lhapdf6,
                    name: known.to_string(),
                    lhapdf_id: Some(id),
                    large_x_power: power,
                })
                .ok_or_else(|| unknown_set(trimmed));
        }
        if let Ok(code) = trimmed.parse::<u32>() {
            return BUILTIN_SETS
                .iter()
                .find(|(known, _, _)| *known == code)
                .map(|&(_, name, power)| PdfSet {
                    identifier: trimmed.to_string(),
                    provider: PdfProvider::Builtin,
                    name: name.to_string(),
                    lhapdf_id: None,
                    large_x_power: power,
                })
                .ok_or_else(|| unknown_set(trimmed));
        }
        Err(unknown_set(trimmed))
    }

    /// Parton luminosity shape at momentum fraction `x`, in `[0, 1]`.
    pub fn luminosity(&self, x: f64) -> f64 {
        if !(x > 0.0 && x < 1.0) {
            return 0.0;
        }
        (1.0 - x).powf(self.large_x_power)
    }
}

impl fmt::Display for PdfSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lhapdf_id {
            Some(id) => write!(f, "{} (LHAPDF id {id})", self.name),
            None => write!(f, "{} (built-in set {})", self.name, self.identifier),
        }
    }
}

fn unknown_set(identifier: &str) -> GenjetsError {
    let known = LHAPDF6_SETS
        .iter()
        .map(|(name, _, _)| format!("LHAPDF6:{name}"))
        .chain(BUILTIN_SETS.iter().map(|(code, _, _)| code.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    GenjetsError::Config(
        ErrorInfo::new("unknown-pdf-set", "PDF set identifier not recognised")
            .with_context("pdf_set", identifier)
            .with_hint(format!("known sets: {known}")),
    )
}
