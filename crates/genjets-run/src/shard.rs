use std::ops::Range;

use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_core::RngHandle;
use genjets_gen::HardQcdGenerator;
use genjets_hist::Histogram1D;
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::pipeline::{Pipeline, RunReport};

/// Splits `0..n_events` into `workers` contiguous ranges whose lengths differ
/// by at most one.
pub fn shard_ranges(n_events: u64, workers: usize) -> Vec<Range<u64>> {
    let workers = workers.max(1) as u64;
    let base = n_events / workers;
    let extra = n_events % workers;
    let mut start = 0;
    (0..workers)
        .map(|shard| {
            let len = base + u64::from(shard < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

fn run_shard(config: &RunConfig, rng: RngHandle, n_events: u64) -> Result<RunReport, GenjetsError> {
    let generator = HardQcdGenerator::with_rng(&config.physics, &config.generator, rng)?;
    let finder = config.jet_definition()?;
    let histogram = Histogram1D::new(
        config.output.histogram_name.clone(),
        config.output.histogram_title.clone(),
        config.binning()?,
    );
    let mut pipeline = Pipeline::new(generator, finder, histogram);
    pipeline.run(n_events)?;
    pipeline.finish()
}

/// Runs `n_events` events with `config.workers` threads.
///
/// With one worker the generator is seeded with the master seed and the
/// loop is the plain sequential one. With more, shard `i` is seeded with
/// [`RngHandle::for_shard`]`(master_seed, i)`, fills a private histogram, and
/// the shard reports are merged in shard order.
pub fn run_sharded(config: &RunConfig, n_events: u64) -> Result<RunReport, GenjetsError> {
    let master_seed = config.seed_policy.master_seed;
    if config.workers <= 1 {
        return run_shard(config, RngHandle::from_seed(master_seed), n_events);
    }

    let ranges = shard_ranges(n_events, config.workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|err| GenjetsError::Generation(ErrorInfo::new("thread-pool", err.to_string())))?;

    let reports: Result<Vec<RunReport>, GenjetsError> = pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .map(|(shard, range)| {
                let rng = RngHandle::for_shard(master_seed, shard as u64);
                log::debug!(
                    "shard {shard}: events {}..{} with seed {:#x}",
                    range.start,
                    range.end,
                    rng.seed()
                );
                run_shard(config, rng, range.end - range.start)
            })
            .collect()
    });

    let mut reports = reports?.into_iter();
    let mut merged = match reports.next() {
        Some(first) => first,
        None => return run_shard(config, RngHandle::from_seed(master_seed), 0),
    };
    for report in reports {
        merged.merge(&report)?;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_all_events() {
        let ranges = shard_ranges(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
        assert_eq!(shard_ranges(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
        assert_eq!(shard_ranges(5, 0), vec![0..5]);
    }

    #[test]
    fn shards_draw_from_their_own_streams() {
        let config = RunConfig {
            workers: 2,
            ..RunConfig::default()
        };
        let master = config.seed_policy.master_seed;
        let merged = run_sharded(&config, 12).unwrap();

        let mut expected = run_shard(&config, RngHandle::for_shard(master, 0), 6).unwrap();
        let second = run_shard(&config, RngHandle::for_shard(master, 1), 6).unwrap();
        expected.merge(&second).unwrap();
        assert_eq!(merged, expected);
    }

    #[test]
    fn single_worker_uses_the_master_seed() {
        let config = RunConfig::default();
        let sequential = run_sharded(&config, 8).unwrap();
        let direct =
            run_shard(&config, RngHandle::from_seed(config.seed_policy.master_seed), 8).unwrap();
        assert_eq!(sequential, direct);
    }
}
