#![deny(missing_docs)]
#![doc = "Event generation for genjets: the `EventGenerator` seam, cross-section bookkeeping, PDF set lookup and a seeded hard-QCD dijet generator."]

use genjets_core::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// String-like fragmentation of outgoing partons and the soft underlying event.
pub mod fragmentation;
/// Hard-QCD 2 → 2 dijet generator.
pub mod hard_qcd;
/// Parton distribution function set identifiers.
pub mod pdf;
/// Cumulative cross-section estimate.
pub mod sigma;

pub use hard_qcd::{HardProcess, HardQcdGenerator, HardQcdSettings};
pub use pdf::{PdfProvider, PdfSet};
pub use sigma::CrossSection;

/// Reason a generator rejected an event internally.
///
/// A failure only costs the current event; the caller skips it and asks for
/// the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum GenerationFailure {
    /// Every hard-process trial of this call was rejected.
    #[error("no hard process accepted after {tries} trials")]
    TrialLimit {
        /// Number of trials attempted.
        tries: u32,
    },
}

/// Source of collision events with a running cross-section estimate.
///
/// The physics configuration is fixed when the generator is constructed and
/// never changes between calls.
pub trait EventGenerator {
    /// Generates the next event.
    fn next_event(&mut self) -> Result<Event, GenerationFailure>;

    /// Cumulative cross-section estimate over every call made so far.
    fn cross_section(&self) -> CrossSection;
}

impl<G: EventGenerator + ?Sized> EventGenerator for Box<G> {
    fn next_event(&mut self) -> Result<Event, GenerationFailure> {
        (**self).next_event()
    }

    fn cross_section(&self) -> CrossSection {
        (**self).cross_section()
    }
}

impl<G: EventGenerator + ?Sized> EventGenerator for &mut G {
    fn next_event(&mut self) -> Result<Event, GenerationFailure> {
        (**self).next_event()
    }

    fn cross_section(&self) -> CrossSection {
        (**self).cross_section()
    }
}
