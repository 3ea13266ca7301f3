use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use genjets_core::errors::GenjetsError;
use genjets_core::RunProvenance;
use genjets_gen::CrossSection;
use genjets_hist::{HistogramDocument, OutputFile};

use crate::config::RunConfig;
use crate::pipeline::RunReport;
use crate::shard::run_sharded;

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Merged pipeline results.
    pub report: RunReport,
    /// Provenance written into the output document.
    pub provenance: RunProvenance,
    /// Where the document was written.
    pub output_path: PathBuf,
}

impl RunSummary {
    /// Final generated cross section in millibarn.
    pub fn sigma_gen(&self) -> f64 {
        self.report.cross_section.sigma_gen()
    }
}

/// Runs `n_events` events end to end and writes the output document.
///
/// The output file is created before the first event so that an unwritable
/// location fails the run up front; it is written exactly once at the end.
pub fn execute(config: &RunConfig, n_events: u64) -> Result<RunSummary, GenjetsError> {
    execute_with(config, n_events, |_| {})
}

/// Like [`execute`], handing the final cross section to `report` after the
/// event loop and before the output document is written.
pub fn execute_with<R>(
    config: &RunConfig,
    n_events: u64,
    report_cross_section: R,
) -> Result<RunSummary, GenjetsError>
where
    R: FnOnce(&CrossSection),
{
    config.validate()?;
    let input_hash = config.input_hash()?;
    log::info!(
        "genjets run: {} events, eCM = {} GeV, pTHatMin = {} GeV, PDF {}, {} R = {}, seed {:#x}, {} worker(s)",
        n_events,
        config.physics.collision_energy,
        config.physics.pt_hat_min,
        config.physics.pdf_set,
        config.jets.algorithm,
        config.jets.radius,
        config.seed_policy.master_seed,
        config.workers
    );
    if let Some(label) = &config.seed_policy.label {
        log::info!("run label: {label}");
    }

    let output = OutputFile::recreate(&config.output.path)?;
    let report = run_sharded(config, n_events)?;

    let tally = &report.tally;
    let sigma = report.cross_section;
    log::info!(
        "events requested {}, clustered {}, generation failures {}, empty selections {}, jets filled {}",
        tally.requested,
        tally.filled_events,
        tally.generation_failed,
        tally.no_final_particles,
        tally.jets_filled
    );
    log::info!(
        "sigma_gen = {:.6e} +- {:.2e} mb from {} trials ({} accepted)",
        sigma.sigma_gen(),
        sigma.sigma_err(),
        sigma.trials,
        sigma.accepted
    );

    report_cross_section(&sigma);

    let histogram = &report.histogram;
    log::info!(
        "{}: {} entries, integral {:.6e}, underflow {:.6e}, overflow {:.6e}, mean {:.3} GeV, std dev {:.3} GeV",
        histogram.name,
        histogram.total_counts(),
        histogram.integral(),
        histogram.underflow(),
        histogram.overflow(),
        histogram.mean(),
        histogram.std_dev()
    );

    let provenance = RunProvenance {
        input_hash,
        seed: config.seed_policy.master_seed,
        events_requested: n_events,
        pdf_set: config.physics.pdf_set.clone(),
        created_at: Utc::now().to_rfc3339(),
        tool_versions: BTreeMap::new(),
    }
    .with_tool("genjets-run", env!("CARGO_PKG_VERSION"));
    let document = HistogramDocument::new(
        provenance.clone(),
        sigma.sigma_gen(),
        sigma.sigma_err(),
        report.histogram.clone(),
    );
    let output_path = output.write(&document)?;
    log::info!("histogram written to {}", output_path.display());

    Ok(RunSummary {
        report,
        provenance,
        output_path,
    })
}
