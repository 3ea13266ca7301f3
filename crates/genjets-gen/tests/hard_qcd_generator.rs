use genjets_core::{ParticleStatus, PhysicsConfig};
use genjets_gen::hard_qcd::MAX_UNDERLYING_EVENT;
use genjets_gen::{EventGenerator, GenerationFailure, HardQcdGenerator, HardQcdSettings};

fn generator(seed: u64) -> HardQcdGenerator {
    HardQcdGenerator::new(&PhysicsConfig::default(), &HardQcdSettings::default(), seed)
        .expect("default configuration is valid")
}

#[test]
fn same_seed_reproduces_events() {
    let mut left = generator(2024);
    let mut right = generator(2024);
    for _ in 0..10 {
        assert_eq!(left.next_event(), right.next_event());
    }
    assert_eq!(left.cross_section(), right.cross_section());
}

#[test]
fn events_contain_beams_and_final_state_hadrons() {
    let mut gen = generator(9);
    let event = (0..50)
        .find_map(|_| gen.next_event().ok())
        .expect("some event is accepted");
    assert_eq!(event.particles[0].status, ParticleStatus::Beam);
    assert_eq!(event.particles[1].status, ParticleStatus::Beam);
    assert_eq!(event.particles[4].status, ParticleStatus::Outgoing);
    assert!(event.final_state().count() >= 2);
    assert!(event.pt_hat >= 25.0);
}

#[test]
fn cross_section_is_monotone_in_trials() {
    let mut gen = generator(1);
    let mut last_trials = 0;
    for _ in 0..25 {
        let _ = gen.next_event();
        let sigma = gen.cross_section();
        assert!(sigma.trials > last_trials);
        assert!(sigma.accepted <= sigma.trials);
        last_trials = sigma.trials;
    }
    let sigma = gen.cross_section();
    assert!(sigma.sigma_gen() > 0.0);
    assert!(sigma.sigma_gen() <= sigma.sigma_max_mb);
}

#[test]
fn closed_phase_space_fails_every_event() {
    // x1 * x2 >= 4 pT^2 / s ~ 0.69 here, so the luminosity kills nearly every trial.
    let physics = PhysicsConfig {
        collision_energy: 60.0,
        pt_hat_min: 25.0,
        ..PhysicsConfig::default()
    };
    let settings = HardQcdSettings {
        max_tries: 1,
        ..HardQcdSettings::default()
    };
    let mut gen = HardQcdGenerator::new(&physics, &settings, 3).unwrap();
    let mut failures = 0;
    for _ in 0..20 {
        if let Err(failure) = gen.next_event() {
            assert_eq!(failure, GenerationFailure::TrialLimit { tries: 1 });
            failures += 1;
        }
    }
    assert!(failures >= 15);
    assert_eq!(gen.cross_section().trials, 20);
}

#[test]
fn biased_generation_produces_weighted_events() {
    let settings = HardQcdSettings {
        bias_power: Some(2.0),
        ..HardQcdSettings::default()
    };
    let mut gen = HardQcdGenerator::new(&PhysicsConfig::default(), &settings, 77).unwrap();
    let weights: Vec<f64> = (0..40)
        .filter_map(|_| gen.next_event().ok())
        .map(|event| event.weight)
        .collect();
    assert!(!weights.is_empty());
    assert!(weights.iter().all(|w| *w > 0.0 && *w <= 3.0));
    assert!(weights.iter().any(|w| (*w - 1.0).abs() > 1e-9));
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let physics = PhysicsConfig {
        pdf_set: "LHAPDF6:Unknown".into(),
        ..PhysicsConfig::default()
    };
    let err = HardQcdGenerator::new(&physics, &HardQcdSettings::default(), 0).unwrap_err();
    assert_eq!(err.info().code, "unknown-pdf-set");

    let settings = HardQcdSettings {
        max_tries: 0,
        ..HardQcdSettings::default()
    };
    assert!(HardQcdGenerator::new(&PhysicsConfig::default(), &settings, 0).is_err());
}

#[test]
fn underlying_event_multiplicity_is_bounded() {
    let settings = HardQcdSettings {
        underlying_event: 3_000_000_000,
        ..HardQcdSettings::default()
    };
    let err = settings.validate().unwrap_err();
    assert_eq!(err.info().context["field"], "generator.underlying_event");
    assert!(HardQcdGenerator::new(&PhysicsConfig::default(), &settings, 0).is_err());

    let settings = HardQcdSettings {
        underlying_event: MAX_UNDERLYING_EVENT,
        ..HardQcdSettings::default()
    };
    let mut gen = HardQcdGenerator::new(&PhysicsConfig::default(), &settings, 9).unwrap();
    let event = (0..50)
        .find_map(|_| gen.next_event().ok())
        .expect("an accepted event");
    assert!(event.particles.len() > 4);
}
