#![deny(missing_docs)]
#![doc = "Core data types shared by the genjets event-to-histogram pipeline: kinematics, errors, seeding and run provenance."]

pub mod config;
pub mod errors;
pub mod kinematics;
pub mod provenance;
pub mod rng;

pub use config::{PhysicsConfig, SeedPolicy};
pub use errors::{ErrorInfo, GenjetsError};
pub use kinematics::{Event, FourMomentum, ParticleRecord, ParticleStatus};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
