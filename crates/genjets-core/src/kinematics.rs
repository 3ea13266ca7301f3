//! Four-momenta, particle records and events.
//!
//! All energies and momenta are in GeV. The beam axis is `z`.

use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Rapidity reported for massless momenta travelling exactly along the beam.
pub const MAX_RAPIDITY: f64 = 1.0e5;

/// Four-momentum `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// x component of momentum.
    pub px: f64,
    /// y component of momentum.
    pub py: f64,
    /// z component of momentum (beam axis).
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its Cartesian components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Builds an on-shell momentum from transverse momentum, rapidity,
    /// azimuth and mass.
    pub fn from_pt_y_phi_m(pt: f64, rapidity: f64, phi: f64, mass: f64) -> Self {
        let mt = (pt * pt + mass * mass).sqrt();
        Self {
            px: pt * phi.cos(),
            py: pt * phi.sin(),
            pz: mt * rapidity.sinh(),
            e: mt * rapidity.cosh(),
        }
    }

    /// Squared transverse momentum.
    pub fn pt2(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.pt2().sqrt()
    }

    /// Squared magnitude of the three-momentum.
    pub fn p2(&self) -> f64 {
        self.pt2() + self.pz * self.pz
    }

    /// Invariant mass squared; may be slightly negative from rounding.
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.p2()
    }

    /// Invariant mass, with negative squares clamped to zero.
    pub fn mass(&self) -> f64 {
        self.mass2().max(0.0).sqrt()
    }

    /// Rapidity `y = ½ ln((E + pz) / (E − pz))`.
    pub fn rapidity(&self) -> f64 {
        let plus = self.e + self.pz;
        let minus = self.e - self.pz;
        if plus <= 0.0 || minus <= 0.0 {
            return if self.pz >= 0.0 {
                MAX_RAPIDITY
            } else {
                -MAX_RAPIDITY
            };
        }
        (0.5 * (plus / minus).ln()).clamp(-MAX_RAPIDITY, MAX_RAPIDITY)
    }

    /// Azimuthal angle in `[0, 2π)`.
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 {
            return 0.0;
        }
        let phi = self.py.atan2(self.px);
        if phi < 0.0 {
            phi + 2.0 * PI
        } else {
            phi
        }
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum::new(
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
            self.e + rhs.e,
        )
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: FourMomentum) {
        *self = *self + rhs;
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), Add::add)
    }
}

/// Position of a record in the event history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleStatus {
    /// Incoming beam particle.
    Beam,
    /// Parton entering the hard process.
    Incoming,
    /// Parton leaving the hard process, before fragmentation.
    Outgoing,
    /// Hadron that decayed within the event.
    Decayed,
    /// Stable particle visible to a detector.
    Final,
}

impl ParticleStatus {
    /// Whether the status marks a final-state particle.
    pub fn is_final(self) -> bool {
        matches!(self, ParticleStatus::Final)
    }
}

/// One entry of a generated event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// PDG particle identifier.
    pub pdg_id: i32,
    /// History status.
    pub status: ParticleStatus,
    /// Four-momentum in GeV.
    pub momentum: FourMomentum,
    /// Index of the mother record, if any.
    pub mother: Option<usize>,
}

impl ParticleRecord {
    /// Creates a record without mother information.
    pub fn new(pdg_id: i32, status: ParticleStatus, momentum: FourMomentum) -> Self {
        Self {
            pdg_id,
            status,
            momentum,
            mother: None,
        }
    }

    /// Attaches a mother index.
    pub fn with_mother(mut self, mother: usize) -> Self {
        self.mother = Some(mother);
        self
    }

    /// Whether this record is a final-state particle.
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }
}

/// A generated collision event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Ordered particle records.
    pub particles: Vec<ParticleRecord>,
    /// Statistical weight of the event.
    pub weight: f64,
    /// Transverse momentum of the hard process.
    pub pt_hat: f64,
}

impl Event {
    /// Creates an event from its records and weight.
    pub fn new(particles: Vec<ParticleRecord>, weight: f64) -> Self {
        Self {
            particles,
            weight,
            pt_hat: 0.0,
        }
    }

    /// Records the hard-process scale.
    pub fn with_pt_hat(mut self, pt_hat: f64) -> Self {
        self.pt_hat = pt_hat;
        self
    }

    /// Number of records, final or not.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the record list is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Iterates over final-state records.
    pub fn final_state(&self) -> impl Iterator<Item = &ParticleRecord> + '_ {
        self.particles.iter().filter(|record| record.is_final())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phi_wraps_into_positive_range() {
        let p = FourMomentum::new(0.0, -1.0, 0.0, 1.0);
        assert!((p.phi() - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn beam_axis_momentum_has_capped_rapidity() {
        let p = FourMomentum::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(p.rapidity(), MAX_RAPIDITY);
        let q = FourMomentum::new(0.0, 0.0, -10.0, 10.0);
        assert_eq!(q.rapidity(), -MAX_RAPIDITY);
    }
}
