use std::f64::consts::PI;

use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_core::{FourMomentum, ParticleRecord, ParticleStatus, RngHandle};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

const PDG_GLUON: i32 = 21;
const PDG_PHOTON: i32 = 22;
const PDG_PI0: i32 = 111;

/// `(pdg id, mass in GeV, cumulative probability)` of the produced hadrons.
const HADRONS: &[(i32, f64, f64)] = &[
    (211, 0.139_57, 0.30),
    (-211, 0.139_57, 0.60),
    (PDG_PI0, 0.134_98, 0.85),
    (321, 0.493_68, 0.91),
    (-321, 0.493_68, 0.97),
    (2212, 0.938_27, 0.985),
    (-2212, 0.938_27, 1.0),
];

/// Ratio of gluon to quark jet multiplicity (C_A / C_F).
const GLUON_MULTIPLICITY_RATIO: f64 = 2.25;

/// Angular spread of hadrons around their parent parton, in rapidity and azimuth.
const ANGULAR_SPREAD: f64 = 0.1;

/// Mean transverse momentum of underlying-event hadrons in GeV.
const SOFT_MEAN_PT: f64 = 0.5;

/// Rapidity reach of the underlying event.
const SOFT_RAPIDITY: f64 = 4.5;

/// Turns outgoing partons into final-state hadrons.
#[derive(Debug, Clone)]
pub struct Fragmenter {
    angular: Normal<f64>,
    fraction: Exp<f64>,
    soft_pt: Exp<f64>,
}

impl Fragmenter {
    /// Builds the sampling distributions.
    pub fn new() -> Result<Self, GenjetsError> {
        let angular = Normal::new(0.0, ANGULAR_SPREAD).map_err(|err| distribution_error("angular", err))?;
        let fraction = Exp::new(1.0).map_err(|err| distribution_error("fraction", err))?;
        let soft_pt =
            Exp::new(1.0 / SOFT_MEAN_PT).map_err(|err| distribution_error("soft-pt", err))?;
        Ok(Self {
            angular,
            fraction,
            soft_pt,
        })
    }

    /// Expected number of primary hadrons from a parton of energy `energy`.
    pub fn mean_multiplicity(energy: f64, pdg_id: i32) -> f64 {
        let quark = 1.0 + 1.2 * energy.max(1.0).ln();
        if pdg_id == PDG_GLUON {
            quark * GLUON_MULTIPLICITY_RATIO
        } else {
            quark
        }
    }

    /// Appends the hadrons of the parton stored at `parent` to `records`.
    ///
    /// The hadrons share the parton's transverse momentum and are spread
    /// around its direction.
    pub fn fragment(&self, rng: &mut RngHandle, records: &mut Vec<ParticleRecord>, parent: usize) {
        let parton = records[parent].clone();
        let mean = Self::mean_multiplicity(parton.momentum.e, parton.pdg_id);
        let jitter = rng.gen_range(-0.5..0.5) * mean.sqrt() * 2.0;
        let count = (mean + jitter).round().max(1.0) as usize;

        let fractions: Vec<f64> = (0..count).map(|_| self.fraction.sample(rng)).collect();
        let total: f64 = fractions.iter().sum();
        let pt = parton.momentum.pt();
        let rapidity = parton.momentum.rapidity();
        let phi = parton.momentum.phi();

        for fraction in fractions {
            let z = if total > 0.0 {
                fraction / total
            } else {
                1.0 / count as f64
            };
            let hadron_y = rapidity + self.angular.sample(rng);
            let hadron_phi = phi + self.angular.sample(rng);
            self.push_hadron(rng, records, Some(parent), z * pt, hadron_y, hadron_phi);
        }
    }

    /// Appends soft beam-remnant hadrons spread over the whole detector.
    pub fn underlying_event(&self, rng: &mut RngHandle, records: &mut Vec<ParticleRecord>, mean: u32) {
        if mean == 0 {
            return;
        }
        let count = rng.gen_range(0..=2 * u64::from(mean));
        for _ in 0..count {
            let pt = self.soft_pt.sample(rng) + 0.05;
            let y = rng.gen_range(-SOFT_RAPIDITY..SOFT_RAPIDITY);
            let phi = rng.gen_range(0.0..2.0 * PI);
            self.push_hadron(rng, records, None, pt, y, phi);
        }
    }

    fn push_hadron(
        &self,
        rng: &mut RngHandle,
        records: &mut Vec<ParticleRecord>,
        mother: Option<usize>,
        pt: f64,
        rapidity: f64,
        phi: f64,
    ) {
        let draw: f64 = rng.gen();
        let &(pdg_id, mass, _) = HADRONS
            .iter()
            .find(|(_, _, cumulative)| draw < *cumulative)
            .unwrap_or(&HADRONS[0]);
        let momentum = FourMomentum::from_pt_y_phi_m(pt, rapidity, phi, mass);

        if pdg_id == PDG_PI0 {
            let index = records.len();
            records.push(with_optional_mother(
                ParticleRecord::new(pdg_id, ParticleStatus::Decayed, momentum),
                mother,
            ));
            let share = rng.gen_range(0.2..0.8);
            for part in [share, 1.0 - share] {
                let px = momentum.px * part;
                let py = momentum.py * part;
                let pz = momentum.pz * part;
                let e = (px * px + py * py + pz * pz).sqrt();
                records.push(
                    ParticleRecord::new(PDG_PHOTON, ParticleStatus::Final, FourMomentum::new(px, py, pz, e))
                        .with_mother(index),
                );
            }
        } else {
            records.push(with_optional_mother(
                ParticleRecord::new(pdg_id, ParticleStatus::Final, momentum),
                mother,
            ));
        }
    }
}

fn with_optional_mother(record: ParticleRecord, mother: Option<usize>) -> ParticleRecord {
    match mother {
        Some(index) => record.with_mother(index),
        None => record,
    }
}

fn distribution_error(name: &str, err: impl ToString) -> GenjetsError {
    GenjetsError::Generation(
        ErrorInfo::new("fragmentation-init", err.to_string()).with_context("distribution", name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gluon_at(pt: f64) -> ParticleRecord {
        ParticleRecord::new(
            PDG_GLUON,
            ParticleStatus::Outgoing,
            FourMomentum::from_pt_y_phi_m(pt, 0.3, 1.0, 0.0),
        )
    }

    #[test]
    fn hadrons_carry_parton_transverse_momentum() {
        let fragmenter = Fragmenter::new().unwrap();
        let mut rng = RngHandle::from_seed(7);
        let mut records = vec![gluon_at(80.0)];
        fragmenter.fragment(&mut rng, &mut records, 0);

        let primary_pt: f64 = records
            .iter()
            .filter(|record| record.mother == Some(0))
            .map(|record| record.momentum.pt())
            .sum();
        assert!((primary_pt - 80.0).abs() < 1e-6, "sum of hadron pT {primary_pt}");
        assert!(records.iter().skip(1).all(|record| record.status != ParticleStatus::Outgoing));
    }

    #[test]
    fn neutral_pions_decay_into_final_photons() {
        let fragmenter = Fragmenter::new().unwrap();
        let mut rng = RngHandle::from_seed(11);
        let mut records = vec![gluon_at(200.0)];
        for _ in 0..20 {
            fragmenter.fragment(&mut rng, &mut records, 0);
        }
        for (index, record) in records.iter().enumerate() {
            if record.pdg_id == PDG_PI0 {
                assert_eq!(record.status, ParticleStatus::Decayed);
                let photons = records
                    .iter()
                    .filter(|other| other.mother == Some(index))
                    .count();
                assert_eq!(photons, 2);
            }
        }
    }

    #[test]
    fn gluons_fragment_into_more_hadrons() {
        let quark = Fragmenter::mean_multiplicity(100.0, 1);
        let gluon = Fragmenter::mean_multiplicity(100.0, PDG_GLUON);
        assert!(gluon > quark);
    }
}
