//! Structured error types shared across genjets crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`GenjetsError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, values, limits).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the genjets pipeline.
///
/// Per-event conditions (a rejected event, an empty final state) are not
/// errors; they are reported as event outcomes. Everything that reaches this
/// type is fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum GenjetsError {
    /// Command line misuse.
    #[error("usage error: {0}")]
    Usage(ErrorInfo),
    /// Invalid run or physics configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Generator initialisation or bookkeeping errors.
    #[error("generation error: {0}")]
    Generation(ErrorInfo),
    /// Jet definition errors.
    #[error("clustering error: {0}")]
    Clustering(ErrorInfo),
    /// Histogram construction and merge errors.
    #[error("histogram error: {0}")]
    Histogram(ErrorInfo),
    /// Output file creation and write errors.
    #[error("storage error: {0}")]
    Storage(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl GenjetsError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            GenjetsError::Usage(info)
            | GenjetsError::Config(info)
            | GenjetsError::Generation(info)
            | GenjetsError::Clustering(info)
            | GenjetsError::Histogram(info)
            | GenjetsError::Storage(info)
            | GenjetsError::Serde(info) => info,
        }
    }

    /// Convenience constructor for configuration errors on a named field.
    pub fn invalid_config(field: &str, value: impl ToString, message: &str) -> Self {
        GenjetsError::Config(
            ErrorInfo::new("invalid-config", message)
                .with_context("field", field)
                .with_context("value", value.to_string()),
        )
    }
}
