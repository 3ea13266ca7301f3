use genjets_jets::JetCandidate;
use serde::{Deserialize, Serialize};

/// What happened to one requested event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The event was clustered; every listed jet was filled with the event weight.
    /// The list may be empty when no jet passed the threshold.
    Filled(Vec<JetCandidate>),
    /// The event had no final-state particles; clustering was not invoked.
    SkippedNoParticles,
    /// The generator rejected the event.
    SkippedGenerationFailed,
}

impl EventOutcome {
    /// Number of histogram fills caused by this event.
    pub fn fills(&self) -> usize {
        match self {
            EventOutcome::Filled(jets) => jets.len(),
            _ => 0,
        }
    }

    /// Whether the event was skipped.
    pub fn is_skipped(&self) -> bool {
        !matches!(self, EventOutcome::Filled(_))
    }
}

/// Counts of event outcomes over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    /// Events requested from the generator.
    pub requested: u64,
    /// Events the generator rejected.
    pub generation_failed: u64,
    /// Events without final-state particles.
    pub no_final_particles: u64,
    /// Events that reached clustering.
    pub filled_events: u64,
    /// Histogram entries made.
    pub jets_filled: u64,
}

impl OutcomeTally {
    /// Records one outcome.
    pub fn record(&mut self, outcome: &EventOutcome) {
        self.requested += 1;
        self.jets_filled += outcome.fills() as u64;
        match outcome {
            EventOutcome::Filled(_) => self.filled_events += 1,
            EventOutcome::SkippedNoParticles => self.no_final_particles += 1,
            EventOutcome::SkippedGenerationFailed => self.generation_failed += 1,
        }
    }

    /// Adds the counts of another tally.
    pub fn merge(&mut self, other: &OutcomeTally) {
        self.requested += other.requested;
        self.generation_failed += other.generation_failed;
        self.no_final_particles += other.no_final_particles;
        self.filled_events += other.filled_events;
        self.jets_filled += other.jets_filled;
    }

    /// Events skipped for any reason.
    pub fn skipped(&self) -> u64 {
        self.generation_failed + self.no_final_particles
    }
}
