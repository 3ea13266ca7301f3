use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_core::{RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::histogram::Histogram1D;

/// Everything persisted at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramDocument {
    /// Layout version of this document.
    pub schema_version: SchemaVersion,
    /// Where the numbers came from.
    pub provenance: RunProvenance,
    /// Final generated cross section in millibarn.
    pub cross_section_mb: f64,
    /// Statistical uncertainty of `cross_section_mb`.
    pub cross_section_err_mb: f64,
    /// Histograms keyed by name.
    pub histograms: BTreeMap<String, Histogram1D>,
}

impl HistogramDocument {
    /// Creates a document holding a single histogram.
    pub fn new(
        provenance: RunProvenance,
        cross_section_mb: f64,
        cross_section_err_mb: f64,
        histogram: Histogram1D,
    ) -> Self {
        let mut histograms = BTreeMap::new();
        histograms.insert(histogram.name.clone(), histogram);
        Self {
            schema_version: SchemaVersion::default(),
            provenance,
            cross_section_mb,
            cross_section_err_mb,
            histograms,
        }
    }

    /// Looks up a histogram by name.
    pub fn histogram(&self, name: &str) -> Option<&Histogram1D> {
        self.histograms.get(name)
    }
}

/// Open output file, created before the event loop and written once after it.
///
/// Creating the handle makes the parent directory and truncates any existing
/// file, so an unwritable location is reported before any event is generated.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    file: File,
}

impl OutputFile {
    /// Creates (or truncates) the file at `path`.
    pub fn recreate(path: impl AsRef<Path>) -> Result<Self, GenjetsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                GenjetsError::Storage(
                    ErrorInfo::new("output-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let file = File::create(path).map_err(|err| {
            GenjetsError::Storage(
                ErrorInfo::new("output-create", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        log::debug!("opened output file {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `document` and closes the file.
    pub fn write(self, document: &HistogramDocument) -> Result<PathBuf, GenjetsError> {
        let write_error = |err: std::io::Error| {
            GenjetsError::Storage(
                ErrorInfo::new("output-write", err.to_string())
                    .with_context("path", self.path.display().to_string()),
            )
        };
        let mut writer = BufWriter::new(&self.file);
        serde_json::to_writer_pretty(&mut writer, document).map_err(|err| {
            GenjetsError::Serde(
                ErrorInfo::new("output-serialize", err.to_string())
                    .with_context("path", self.path.display().to_string()),
            )
        })?;
        writer.write_all(b"\n").map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        drop(writer);
        self.file.sync_all().map_err(write_error)?;
        Ok(self.path)
    }
}

/// Reads a document previously written by [`OutputFile::write`].
pub fn load_document(path: impl AsRef<Path>) -> Result<HistogramDocument, GenjetsError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| {
        GenjetsError::Storage(
            ErrorInfo::new("output-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    serde_json::from_str(&contents).map_err(|err| {
        GenjetsError::Serde(
            ErrorInfo::new("output-parse", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}
