use std::cell::Cell;

use genjets_core::{Event, FourMomentum, ParticleRecord, ParticleStatus};
use genjets_gen::{CrossSection, EventGenerator, GenerationFailure};
use genjets_hist::{Binning, Histogram1D};
use genjets_jets::{JetAlgorithm, JetCandidate, JetDefinition, JetFinder};
use genjets_run::{process_event, EventOutcome, Pipeline};
use proptest::prelude::*;

/// Replays a fixed list of generator results, then fails.
struct Scripted {
    events: Vec<Result<Event, GenerationFailure>>,
    next: usize,
    sigma: CrossSection,
}

impl Scripted {
    fn new(events: Vec<Result<Event, GenerationFailure>>) -> Self {
        Self {
            events,
            next: 0,
            sigma: CrossSection::new(2.0),
        }
    }
}

impl EventGenerator for Scripted {
    fn next_event(&mut self) -> Result<Event, GenerationFailure> {
        self.sigma.record_trial();
        let result = self
            .events
            .get(self.next)
            .cloned()
            .unwrap_or(Err(GenerationFailure::TrialLimit { tries: 1 }));
        self.next += 1;
        if let Ok(event) = &result {
            self.sigma.record_accepted(event.weight);
        }
        result
    }

    fn cross_section(&self) -> CrossSection {
        self.sigma
    }
}

/// Counts clustering calls and turns every particle into its own jet.
#[derive(Default)]
struct CountingFinder {
    calls: Cell<usize>,
}

impl JetFinder for CountingFinder {
    fn inclusive_jets(&self, particles: &[FourMomentum]) -> Vec<JetCandidate> {
        self.calls.set(self.calls.get() + 1);
        particles.iter().copied().map(JetCandidate::new).collect()
    }
}

fn final_particle(p: FourMomentum) -> ParticleRecord {
    ParticleRecord::new(211, ParticleStatus::Final, p)
}

fn jet_pt_histogram() -> Histogram1D {
    Histogram1D::new("Jet pT", "N(p_{T})", Binning::for_pt_threshold(25.0).unwrap())
}

#[test]
fn single_final_particle_fills_the_bin_holding_five() {
    let event = Event::new(vec![final_particle(FourMomentum::new(3.0, 4.0, 0.0, 5.0))], 1.0);
    let mut generator = Scripted::new(vec![Ok(event)]);
    let finder = JetDefinition::new(JetAlgorithm::AntiKt, 0.4, 0.0).unwrap();
    let mut hist = jet_pt_histogram();

    let outcome = process_event(&mut generator, &finder, &mut hist);
    match &outcome {
        EventOutcome::Filled(jets) => {
            assert_eq!(jets.len(), 1);
            assert!((jets[0].pt - 5.0).abs() < 1e-9);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let bin = hist.binning.find_bin(5.0);
    assert_eq!(hist.bin_content(bin), 1.0);
    assert_eq!(hist.total_weight(), 1.0);
}

#[test]
fn empty_selection_skips_clustering() {
    let only_beams = Event::new(
        vec![ParticleRecord::new(
            2212,
            ParticleStatus::Beam,
            FourMomentum::new(0.0, 0.0, 3500.0, 3500.0),
        )],
        1.0,
    );
    let mut generator = Scripted::new(vec![Ok(only_beams), Ok(Event::new(Vec::new(), 1.0))]);
    let finder = CountingFinder::default();
    let mut hist = jet_pt_histogram();

    for _ in 0..2 {
        let outcome = process_event(&mut generator, &finder, &mut hist);
        assert_eq!(outcome, EventOutcome::SkippedNoParticles);
    }
    assert_eq!(finder.calls.get(), 0);
    assert!(hist.is_empty());
}

#[test]
fn generation_failure_is_skipped_and_counted() {
    let good = Event::new(vec![final_particle(FourMomentum::new(30.0, 0.0, 0.0, 30.0))], 0.5);
    let mut pipeline = Pipeline::new(
        Scripted::new(vec![
            Err(GenerationFailure::TrialLimit { tries: 100 }),
            Ok(good),
        ]),
        CountingFinder::default(),
        jet_pt_histogram(),
    );
    pipeline.run(4).unwrap();
    let report = pipeline.finish().unwrap();
    assert_eq!(report.tally.requested, 4);
    assert_eq!(report.tally.generation_failed, 3);
    assert_eq!(report.tally.filled_events, 1);
    assert_eq!(report.histogram.total_weight(), 0.5);
    assert_eq!(report.cross_section.trials, 4);
}

#[test]
fn zero_events_leave_an_empty_histogram() {
    let mut pipeline = Pipeline::new(Scripted::new(Vec::new()), CountingFinder::default(), jet_pt_histogram());
    pipeline.run(0).unwrap();
    let report = pipeline.finish().unwrap();
    assert!(report.histogram.sumw.iter().all(|w| *w == 0.0));
    assert_eq!(report.cross_section.sigma_gen(), 0.0);
    assert_eq!(report.tally.requested, 0);
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        prop::collection::vec((0.1f64..140.0, 0.0f64..6.28, any::<bool>()), 0..6),
        0.1f64..4.0,
    )
        .prop_map(|(particles, weight)| {
            let records = particles
                .into_iter()
                .map(|(pt, phi, is_final)| {
                    let status = if is_final {
                        ParticleStatus::Final
                    } else {
                        ParticleStatus::Decayed
                    };
                    ParticleRecord::new(211, status, FourMomentum::from_pt_y_phi_m(pt, 0.0, phi, 0.0))
                })
                .collect();
            Event::new(records, weight)
        })
}

fn run_events(events: &[Event]) -> genjets_run::RunReport {
    let mut pipeline = Pipeline::new(
        Scripted::new(events.iter().cloned().map(Ok).collect()),
        CountingFinder::default(),
        jet_pt_histogram(),
    );
    pipeline.run(events.len() as u64).unwrap();
    pipeline.finish().unwrap()
}

proptest! {
    #[test]
    fn fills_match_jets_and_weights(events in prop::collection::vec(arb_event(), 0..20)) {
        let report = run_events(&events);
        let hist = &report.histogram;

        let expected_fills: u64 = events.iter().map(|e| e.final_state().count() as u64).sum();
        let expected_weight: f64 = events
            .iter()
            .map(|e| e.final_state().count() as f64 * e.weight)
            .sum();
        prop_assert_eq!(hist.total_counts(), expected_fills);
        prop_assert_eq!(report.tally.jets_filled, expected_fills);
        prop_assert!((hist.total_weight() - expected_weight).abs() < 1e-9 * (1.0 + expected_weight));

        let clustered = events.iter().filter(|e| e.final_state().count() > 0).count() as u64;
        prop_assert_eq!(report.tally.filled_events, clustered);
        prop_assert!(report.tally.filled_events <= report.tally.requested);
    }

    #[test]
    fn event_order_does_not_change_the_histogram(events in prop::collection::vec(arb_event(), 0..20)) {
        let forward = run_events(&events);
        let mut reversed_events = events.clone();
        reversed_events.reverse();
        let reversed = run_events(&reversed_events);

        prop_assert_eq!(&forward.histogram.counts, &reversed.histogram.counts);
        for (a, b) in forward.histogram.sumw.iter().zip(&reversed.histogram.sumw) {
            prop_assert!((a - b).abs() <= 1e-9 * (1.0 + a.abs()));
        }
        prop_assert_eq!(forward.tally, reversed.tally);
    }
}
