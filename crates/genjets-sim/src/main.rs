use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use genjets_core::errors::{ErrorInfo, GenjetsError};
use genjets_run::{execute_with, RunConfig};

const USAGE_HINT: &str = "usage: genjets-sim <number of events> [--config <yaml>] [--seed <u64>] [--output <path>] [--workers <n>] [--quiet]";

#[derive(Parser, Debug)]
#[command(
    name = "genjets-sim",
    version,
    about = "Generate hard-QCD events, cluster anti-kt jets and histogram their pT"
)]
struct Cli {
    /// Number of events to generate.
    #[arg(value_name = "EVENTS", allow_negative_numbers = true)]
    events: Vec<String>,
    /// YAML run configuration; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Master seed overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Output document path overriding the configuration.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Worker threads overriding the configuration.
    #[arg(long)]
    workers: Option<usize>,
    /// Only log warnings and errors.
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };
    init_logging(cli.quiet);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let n_events = event_count(&cli.events)?;

    let mut config = match &cli.config {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            RunConfig::load(path)?
        }
        None => RunConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed_policy.master_seed = seed;
    }
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    execute_with(&config, n_events, |sigma| println!("{}", sigma.sigma_gen()))?;
    Ok(())
}

fn event_count(values: &[String]) -> Result<u64, GenjetsError> {
    let [value] = values else {
        return Err(GenjetsError::Usage(
            ErrorInfo::new(
                "argument-count",
                format!(
                    "expected 1 parameter while {} parameter(s) were provided",
                    values.len()
                ),
            )
            .with_hint(USAGE_HINT),
        ));
    };
    value.trim().parse::<u64>().map_err(|err| {
        GenjetsError::Usage(
            ErrorInfo::new("invalid-event-count", err.to_string())
                .with_context("events", value.as_str())
                .with_hint("the number of events must be a non-negative integer"),
        )
    })
}
