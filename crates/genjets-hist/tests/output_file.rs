use std::fs;

use genjets_core::{GenjetsError, RunProvenance};
use genjets_hist::{load_document, Binning, Histogram1D, HistogramDocument, OutputFile};
use tempfile::tempdir;

fn jet_pt_histogram() -> Histogram1D {
    let mut hist = Histogram1D::new("Jet pT", "N(p_{T})", Binning::for_pt_threshold(25.0).unwrap());
    hist.fill(30.0, 1.0);
    hist.fill(57.5, 0.25);
    hist
}

#[test]
fn creates_parent_directory_and_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output").join("basic_pythia.json");
    let handle = OutputFile::recreate(&path).unwrap();
    assert!(path.exists());

    let provenance = RunProvenance {
        seed: 7,
        events_requested: 2,
        ..RunProvenance::default()
    };
    let document = HistogramDocument::new(provenance, 1.5e-3, 1.0e-5, jet_pt_histogram());
    let written = handle.write(&document).unwrap();
    assert_eq!(written, path);

    let loaded = load_document(&path).unwrap();
    assert_eq!(loaded, document);
    let hist = loaded.histogram("Jet pT").unwrap();
    assert_eq!(hist.title, "N(p_{T})");
    assert_eq!(hist.binning.bins, 1025);
    assert_eq!(hist.total_weight(), 1.25);
}

#[test]
fn recreate_truncates_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("basic_pythia.json");
    fs::write(&path, "stale contents").unwrap();
    let _handle = OutputFile::recreate(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn unwritable_location_is_a_storage_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-directory");
    fs::write(&blocker, "file").unwrap();
    let err = OutputFile::recreate(blocker.join("basic_pythia.json")).unwrap_err();
    assert!(matches!(err, GenjetsError::Storage(_)));
    assert_eq!(err.info().code, "output-mkdir");
}

#[test]
fn loading_garbage_is_a_serde_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_document(&path).unwrap_err();
    assert_eq!(err.info().code, "output-parse");
    assert!(load_document(dir.path().join("missing.json")).is_err());
}
