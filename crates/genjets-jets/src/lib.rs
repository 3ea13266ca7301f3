#![deny(missing_docs, deprecated)]
#![doc = "Final-state particle selection and inclusive jet clustering for genjets."]

/// Jet definitions, the `JetFinder` seam and the clustering backend.
pub mod clustering;
/// Final-state particle selection.
pub mod selection;

pub use clustering::{JetAlgorithm, JetCandidate, JetDefinition, JetFinder};
pub use selection::select_final_state;
