use std::f64::consts::PI;

use genjets_core::errors::GenjetsError;
use genjets_core::{Event, FourMomentum, ParticleRecord, ParticleStatus, PhysicsConfig, RngHandle};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fragmentation::Fragmenter;
use crate::pdf::PdfSet;
use crate::sigma::CrossSection;
use crate::{EventGenerator, GenerationFailure};

/// Normalisation of the dσ/dpT ∝ pT⁻⁴ envelope, in mb·GeV³.
pub const SIGMA_NORM_MB_GEV3: f64 = 0.05;

/// Upper bound on the mean underlying-event multiplicity.
pub const MAX_UNDERLYING_EVENT: u32 = 10_000;

const PDG_PROTON: i32 = 2212;
const PDG_GLUON: i32 = 21;

/// Tuning knobs of the hard-QCD generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardQcdSettings {
    /// Hard-process trials per `next_event` call before the event is rejected.
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    /// Optional pT-hat bias exponent `k`; events are then weighted.
    #[serde(default)]
    pub bias_power: Option<f64>,
    /// Mean multiplicity of soft underlying-event hadrons.
    #[serde(default = "default_underlying_event")]
    pub underlying_event: u32,
}

fn default_max_tries() -> u32 {
    100
}

fn default_underlying_event() -> u32 {
    6
}

impl Default for HardQcdSettings {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
            bias_power: None,
            underlying_event: default_underlying_event(),
        }
    }
}

impl HardQcdSettings {
    /// Checks the settings.
    pub fn validate(&self) -> Result<(), GenjetsError> {
        if self.max_tries == 0 {
            return Err(GenjetsError::invalid_config(
                "generator.max_tries",
                self.max_tries,
                "at least one trial per event is required",
            ));
        }
        if self.underlying_event > MAX_UNDERLYING_EVENT {
            return Err(GenjetsError::invalid_config(
                "generator.underlying_event",
                self.underlying_event,
                &format!("mean underlying-event multiplicity must not exceed {MAX_UNDERLYING_EVENT}"),
            ));
        }
        if let Some(power) = self.bias_power {
            if !(0.0..3.0).contains(&power) {
                return Err(GenjetsError::invalid_config(
                    "generator.bias_power",
                    power,
                    "bias power must lie in [0, 3)",
                ));
            }
        }
        Ok(())
    }
}

/// 2 → 2 QCD subprocess channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardProcess {
    /// g g → g g
    GluonGluon,
    /// q g → q g
    QuarkGluon,
    /// q q → q q
    QuarkQuark,
}

impl HardProcess {
    fn sample(rng: &mut RngHandle) -> Self {
        let draw: f64 = rng.gen();
        if draw < 0.55 {
            HardProcess::GluonGluon
        } else if draw < 0.92 {
            HardProcess::QuarkGluon
        } else {
            HardProcess::QuarkQuark
        }
    }

    /// Process label in the usual arrow notation.
    pub fn label(&self) -> &'static str {
        match self {
            HardProcess::GluonGluon => "g g -> g g",
            HardProcess::QuarkGluon => "q g -> q g",
            HardProcess::QuarkQuark => "q q -> q q",
        }
    }

    /// PDG ids of the incoming and outgoing partons.
    fn parton_ids(&self, rng: &mut RngHandle) -> ([i32; 2], [i32; 2]) {
        match self {
            HardProcess::GluonGluon => ([PDG_GLUON; 2], [PDG_GLUON; 2]),
            HardProcess::QuarkGluon => {
                let quark = random_quark(rng);
                ([quark, PDG_GLUON], [quark, PDG_GLUON])
            }
            HardProcess::QuarkQuark => {
                let first = random_quark(rng);
                let second = random_quark(rng);
                ([first, second], [first, second])
            }
        }
    }
}

fn random_quark(rng: &mut RngHandle) -> i32 {
    let flavour = rng.gen_range(1..=4);
    if rng.gen_bool(0.5) {
        flavour
    } else {
        -flavour
    }
}

/// Kinematics of one accepted hard-process trial.
#[derive(Debug, Clone, Copy)]
struct HardKinematics {
    process: HardProcess,
    pt_hat: f64,
    y3: f64,
    y4: f64,
    phi: f64,
    x1: f64,
    x2: f64,
    weight: f64,
}

/// Seeded hard-QCD dijet generator.
///
/// Hard-process transverse momenta follow dσ/dpT ∝ pT⁻⁴ above
/// `pt_hat_min`, outgoing rapidities are flat in `[-y_max, y_max]`, and trials
/// are accepted with the PDF luminosity of both momentum fractions. Accepted
/// trials are dressed with fragmentation hadrons and an underlying event.
#[derive(Debug, Clone)]
pub struct HardQcdGenerator {
    physics: PhysicsConfig,
    settings: HardQcdSettings,
    pdf: PdfSet,
    rng: RngHandle,
    fragmenter: Fragmenter,
    sigma: CrossSection,
    y_max: f64,
}

impl HardQcdGenerator {
    /// Validates the configuration and initialises the generator.
    pub fn new(
        physics: &PhysicsConfig,
        settings: &HardQcdSettings,
        seed: u64,
    ) -> Result<Self, GenjetsError> {
        Self::with_rng(physics, settings, RngHandle::from_seed(seed))
    }

    /// Like [`HardQcdGenerator::new`], drawing from an existing stream.
    pub fn with_rng(
        physics: &PhysicsConfig,
        settings: &HardQcdSettings,
        rng: RngHandle,
    ) -> Result<Self, GenjetsError> {
        physics.validate()?;
        settings.validate()?;
        let pdf = PdfSet::parse(&physics.pdf_set)?;
        let y_max = (physics.collision_energy / physics.pt_hat_min).ln();
        let sigma_max_mb =
            SIGMA_NORM_MB_GEV3 * (2.0 * y_max).powi(2) / physics.pt_hat_min.powi(3);
        log::debug!(
            "hard QCD generator: seed {:#x}, eCM = {} GeV, pTHatMin = {} GeV, PDF {}, y_max = {:.3}, sigma_max = {:.4e} mb",
            rng.seed(),
            physics.collision_energy,
            physics.pt_hat_min,
            pdf,
            y_max,
            sigma_max_mb
        );
        Ok(Self {
            physics: physics.clone(),
            settings: settings.clone(),
            pdf,
            rng,
            fragmenter: Fragmenter::new()?,
            sigma: CrossSection::new(sigma_max_mb),
            y_max,
        })
    }

    /// Draws one hard-process trial; `None` when it is rejected.
    fn sample_trial(&mut self) -> Option<HardKinematics> {
        let pt_min = self.physics.pt_hat_min;
        let sqrt_s = self.physics.collision_energy;
        let power = self.settings.bias_power.unwrap_or(0.0);

        let exponent = 3.0 - power;
        let uniform = self.rng.open_unit();
        let pt_hat = pt_min * uniform.powf(-1.0 / exponent);
        let weight = 3.0 / exponent * (pt_min / pt_hat).powf(power);

        let y3 = self.rng.gen_range(-self.y_max..self.y_max);
        let y4 = self.rng.gen_range(-self.y_max..self.y_max);
        let phi = self.rng.gen_range(0.0..2.0 * PI);

        let x1 = pt_hat / sqrt_s * (y3.exp() + y4.exp());
        let x2 = pt_hat / sqrt_s * ((-y3).exp() + (-y4).exp());
        if x1 >= 1.0 || x2 >= 1.0 {
            return None;
        }
        let acceptance = self.pdf.luminosity(x1) * self.pdf.luminosity(x2);
        if self.rng.gen::<f64>() >= acceptance {
            return None;
        }
        let process = HardProcess::sample(&mut self.rng);
        Some(HardKinematics {
            process,
            pt_hat,
            y3,
            y4,
            phi,
            x1,
            x2,
            weight,
        })
    }

    fn build_event(&mut self, kin: &HardKinematics) -> Event {
        let half = self.physics.collision_energy / 2.0;
        let (incoming, outgoing) = kin.process.parton_ids(&mut self.rng);

        let mut records = Vec::with_capacity(64);
        records.push(ParticleRecord::new(
            PDG_PROTON,
            ParticleStatus::Beam,
            FourMomentum::new(0.0, 0.0, half, half),
        ));
        records.push(ParticleRecord::new(
            PDG_PROTON,
            ParticleStatus::Beam,
            FourMomentum::new(0.0, 0.0, -half, half),
        ));
        records.push(
            ParticleRecord::new(
                incoming[0],
                ParticleStatus::Incoming,
                FourMomentum::new(0.0, 0.0, kin.x1 * half, kin.x1 * half),
            )
            .with_mother(0),
        );
        records.push(
            ParticleRecord::new(
                incoming[1],
                ParticleStatus::Incoming,
                FourMomentum::new(0.0, 0.0, -kin.x2 * half, kin.x2 * half),
            )
            .with_mother(1),
        );
        records.push(
            ParticleRecord::new(
                outgoing[0],
                ParticleStatus::Outgoing,
                FourMomentum::from_pt_y_phi_m(kin.pt_hat, kin.y3, kin.phi, 0.0),
            )
            .with_mother(2),
        );
        records.push(
            ParticleRecord::new(
                outgoing[1],
                ParticleStatus::Outgoing,
                FourMomentum::from_pt_y_phi_m(kin.pt_hat, kin.y4, kin.phi + PI, 0.0),
            )
            .with_mother(3),
        );

        self.fragmenter.fragment(&mut self.rng, &mut records, 4);
        self.fragmenter.fragment(&mut self.rng, &mut records, 5);
        self.fragmenter
            .underlying_event(&mut self.rng, &mut records, self.settings.underlying_event);

        log::trace!(
            "{} at pT-hat {:.2} GeV with {} records",
            kin.process.label(),
            kin.pt_hat,
            records.len()
        );
        Event::new(records, kin.weight).with_pt_hat(kin.pt_hat)
    }
}

impl EventGenerator for HardQcdGenerator {
    fn next_event(&mut self) -> Result<Event, GenerationFailure> {
        for _ in 0..self.settings.max_tries {
            self.sigma.record_trial();
            if let Some(kin) = self.sample_trial() {
                self.sigma.record_accepted(kin.weight);
                return Ok(self.build_event(&kin));
            }
        }
        Err(GenerationFailure::TrialLimit {
            tries: self.settings.max_tries,
        })
    }

    fn cross_section(&self) -> CrossSection {
        self.sigma
    }
}
