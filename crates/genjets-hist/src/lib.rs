#![deny(missing_docs)]
#![doc = "Fixed-binning weighted histograms and the JSON output document written at the end of a genjets run."]

/// Uniform bin layouts with underflow and overflow.
pub mod binning;
/// One-dimensional weighted histogram.
pub mod histogram;
/// Output document and the file handle it is written through.
pub mod store;

pub use binning::Binning;
pub use histogram::Histogram1D;
pub use store::{load_document, HistogramDocument, OutputFile};
