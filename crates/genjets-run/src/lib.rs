#![deny(missing_docs)]
#![doc = "The genjets event-to-histogram pipeline: run configuration, per-event outcomes, the event loop, sharded execution and output persistence."]

/// YAML run configuration.
pub mod config;
/// Per-event outcomes and their tally.
pub mod outcome;
/// The per-event step and the run state machine.
pub mod pipeline;
/// Full runs: banner, sharded event loop and output document.
pub mod run;
/// Splitting a run across worker threads.
pub mod shard;

pub use config::{JetsConfig, OutputConfig, RunConfig};
pub use outcome::{EventOutcome, OutcomeTally};
pub use pipeline::{process_event, Pipeline, RunPhase, RunReport};
pub use run::{execute, execute_with, RunSummary};
pub use shard::{run_sharded, shard_ranges};
