use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_gen::{CrossSection, EventGenerator};
use genjets_hist::Histogram1D;
use genjets_jets::{select_final_state, JetFinder};
use serde::{Deserialize, Serialize};

use crate::outcome::{EventOutcome, OutcomeTally};

/// Runs one event through generation, selection, clustering and filling.
///
/// Every jet is filled at its pT with the full event weight. Clustering is
/// only invoked when the selection is non-empty.
pub fn process_event<G, F>(generator: &mut G, finder: &F, histogram: &mut Histogram1D) -> EventOutcome
where
    G: EventGenerator + ?Sized,
    F: JetFinder + ?Sized,
{
    let event = match generator.next_event() {
        Ok(event) => event,
        Err(failure) => {
            log::debug!("skipping event: {failure}");
            return EventOutcome::SkippedGenerationFailed;
        }
    };
    let particles = select_final_state(&event);
    if particles.is_empty() {
        log::debug!("skipping event without final-state particles");
        return EventOutcome::SkippedNoParticles;
    }
    let jets = finder.inclusive_jets(&particles);
    for jet in &jets {
        histogram.fill(jet.pt, event.weight);
    }
    EventOutcome::Filled(jets)
}

/// Lifecycle of a [`Pipeline`]; each phase is entered once, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    /// Constructed, no event requested yet.
    Idle,
    /// Inside the event loop.
    Running,
    /// Loop finished, results not yet collected.
    Finalizing,
    /// Results handed out.
    Done,
}

/// Results of a finished pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Accumulated histogram.
    pub histogram: Histogram1D,
    /// Outcome counts.
    pub tally: OutcomeTally,
    /// Generator cross section after the last event.
    pub cross_section: CrossSection,
}

impl RunReport {
    /// Adds another report bin by bin.
    pub fn merge(&mut self, other: &RunReport) -> Result<(), GenjetsError> {
        self.histogram.merge(&other.histogram)?;
        self.cross_section.merge(&other.cross_section)?;
        self.tally.merge(&other.tally);
        Ok(())
    }
}

/// Sequential event loop owning a generator, a jet finder and the histogram.
#[derive(Debug)]
pub struct Pipeline<G, F> {
    generator: G,
    finder: F,
    histogram: Histogram1D,
    tally: OutcomeTally,
    phase: RunPhase,
}

impl<G: EventGenerator, F: JetFinder> Pipeline<G, F> {
    /// Creates an idle pipeline around an empty histogram.
    pub fn new(generator: G, finder: F, histogram: Histogram1D) -> Self {
        Self {
            generator,
            finder,
            histogram,
            tally: OutcomeTally::default(),
            phase: RunPhase::Idle,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Histogram accumulated so far.
    pub fn histogram(&self) -> &Histogram1D {
        &self.histogram
    }

    /// Outcome counts so far.
    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }

    /// Requests `n_events` events in index order.
    pub fn run(&mut self, n_events: u64) -> Result<&OutcomeTally, GenjetsError> {
        self.advance(RunPhase::Idle, RunPhase::Running)?;
        for index in 0..n_events {
            let outcome = process_event(&mut self.generator, &self.finder, &mut self.histogram);
            if outcome.is_skipped() {
                log::trace!("event {index}: {outcome:?}");
            }
            self.tally.record(&outcome);
        }
        self.advance(RunPhase::Running, RunPhase::Finalizing)?;
        Ok(&self.tally)
    }

    /// Reads the final cross section and hands out the results.
    pub fn finish(mut self) -> Result<RunReport, GenjetsError> {
        self.advance(RunPhase::Finalizing, RunPhase::Done)?;
        Ok(RunReport {
            cross_section: self.generator.cross_section(),
            histogram: self.histogram,
            tally: self.tally,
        })
    }

    fn advance(&mut self, from: RunPhase, to: RunPhase) -> Result<(), GenjetsError> {
        if self.phase != from {
            return Err(GenjetsError::Usage(
                ErrorInfo::new("pipeline-phase", "pipeline step called out of order")
                    .with_context("expected", format!("{from:?}"))
                    .with_context("actual", format!("{:?}", self.phase)),
            ));
        }
        log::debug!("pipeline {from:?} -> {to:?}");
        self.phase = to;
        Ok(())
    }
}
