//! Simulate command implementation for the Waymark CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::{Parser, ValueEnum};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::Attraction;
use waymark_dispatch::{BatchReport, ConcurrentDispatcher, PoolSizing};
use waymark_rewards::{DEFAULT_REWARD_RADIUS_MILES, RewardEngine};
use waymark_service::simulation::{
    BuiltinCatalog, LatencyRewardOracle, RandomLocationProvider, SimulatedTripPricer,
};
use waymark_service::{
    BatchOrchestrator, BatchTimeouts, TourGuide, UserRegistry, seed_internal_users,
};

use crate::{
    ARG_ATTRACTIONS, ARG_MIN_WORKERS, ARG_MODE, ARG_ORACLE_LATENCY_MS, ARG_REWARD_RADIUS,
    ARG_SEED, ARG_TIMEOUT_SECS, ARG_USERS, ARG_WORKERS_PER_CPU, CliError, ENV_REWARD_RADIUS,
    ENV_TIMEOUT_SECS, ENV_USERS,
};

const DEFAULT_USERS: usize = 100;
const DEFAULT_ORACLE_LATENCY_MS: u64 = 10;
const DEFAULT_SEED: u64 = 42;

/// Which batch the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SimulationMode {
    /// Calculate rewards from the seeded position history.
    #[default]
    Rewards,
    /// Track every user once, rewarding each new position.
    Track,
}

/// CLI arguments for the `simulate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Seed internal users with random position histories and run \
                 one reward or tracking batch over them, using simulated \
                 location, reward and pricing services. Prints a JSON \
                 summary of the batch.",
    about = "Run one batch against simulated services"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct SimulateArgs {
    /// Number of internal users to seed.
    #[arg(long = ARG_USERS, value_name = "count")]
    #[serde(default)]
    pub(crate) users: Option<usize>,
    /// Batch to run.
    #[arg(long = ARG_MODE, value_enum)]
    #[serde(default)]
    pub(crate) mode: Option<SimulationMode>,
    /// Radius within which a visit earns a reward.
    #[arg(long = ARG_REWARD_RADIUS, value_name = "miles")]
    #[serde(default)]
    pub(crate) reward_radius_miles: Option<f64>,
    /// Lower bound on the worker count.
    #[arg(long = ARG_MIN_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) min_workers: Option<usize>,
    /// Workers started per available CPU.
    #[arg(long = ARG_WORKERS_PER_CPU, value_name = "count")]
    #[serde(default)]
    pub(crate) workers_per_cpu: Option<usize>,
    /// Deadline for the whole batch.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Artificial delay added to every reward lookup.
    #[arg(long = ARG_ORACLE_LATENCY_MS, value_name = "millis")]
    #[serde(default)]
    pub(crate) oracle_latency_ms: Option<u64>,
    /// Seed for users, positions and reward points.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// JSON file holding the attraction catalog; the built-in catalog is
    /// used when absent.
    #[arg(long = ARG_ATTRACTIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) attractions: Option<Utf8PathBuf>,
}

impl SimulateArgs {
    pub(crate) fn into_config(self) -> Result<SimulateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SimulateConfig::try_from(merged)
    }
}

/// Resolved `simulate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SimulateConfig {
    pub(crate) users: usize,
    pub(crate) mode: SimulationMode,
    pub(crate) reward_radius_miles: f64,
    pub(crate) sizing: PoolSizing,
    pub(crate) timeouts: BatchTimeouts,
    pub(crate) oracle_latency: Duration,
    pub(crate) seed: u64,
    pub(crate) attractions: Option<Utf8PathBuf>,
}

impl TryFrom<SimulateArgs> for SimulateConfig {
    type Error = CliError;

    fn try_from(args: SimulateArgs) -> Result<Self, Self::Error> {
        let users = args.users.unwrap_or(DEFAULT_USERS);
        if users == 0 {
            return Err(CliError::InvalidArgument {
                field: ARG_USERS,
                env: ENV_USERS,
                reason: String::from("at least one user is required"),
            });
        }

        let reward_radius_miles = args
            .reward_radius_miles
            .unwrap_or(DEFAULT_REWARD_RADIUS_MILES);
        if !reward_radius_miles.is_finite() || reward_radius_miles.is_sign_negative() {
            return Err(CliError::InvalidArgument {
                field: ARG_REWARD_RADIUS,
                env: ENV_REWARD_RADIUS,
                reason: format!("{reward_radius_miles} is not a distance"),
            });
        }

        let timeouts = match args.timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    env: ENV_TIMEOUT_SECS,
                    reason: String::from("the deadline must be positive"),
                });
            }
            Some(seconds) => BatchTimeouts::uniform(Duration::from_secs(seconds)),
            None => BatchTimeouts::default(),
        };

        let defaults = PoolSizing::default();
        let sizing = PoolSizing {
            minimum_workers: args.min_workers.unwrap_or(defaults.minimum_workers),
            workers_per_cpu: args.workers_per_cpu.unwrap_or(defaults.workers_per_cpu),
        };

        Ok(Self {
            users,
            mode: args.mode.unwrap_or_default(),
            reward_radius_miles,
            sizing,
            timeouts,
            oracle_latency: Duration::from_millis(
                args.oracle_latency_ms.unwrap_or(DEFAULT_ORACLE_LATENCY_MS),
            ),
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            attractions: args.attractions,
        })
    }
}

/// A failed job as it appears in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FailureSummary {
    pub(crate) user: String,
    pub(crate) cause: String,
}

/// JSON document printed once the batch finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SimulationSummary {
    pub(crate) mode: SimulationMode,
    pub(crate) users: usize,
    pub(crate) workers: usize,
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
    pub(crate) elapsed_ms: u64,
    pub(crate) total_rewards: usize,
    pub(crate) total_reward_points: u64,
    pub(crate) failures: Vec<FailureSummary>,
}

struct BatchCounts {
    succeeded: usize,
    failed: usize,
    elapsed: Duration,
    failures: Vec<FailureSummary>,
}

impl<T> From<BatchReport<T>> for BatchCounts {
    fn from(report: BatchReport<T>) -> Self {
        Self {
            succeeded: report.succeeded(),
            failed: report.failed(),
            elapsed: report.elapsed(),
            failures: report
                .failures()
                .iter()
                .map(|failure| FailureSummary {
                    user: failure.label.clone(),
                    cause: failure.cause.to_string(),
                })
                .collect(),
        }
    }
}

pub(super) fn run_simulate(args: SimulateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_simulate_with(args, &mut stdout)
}

pub(super) fn run_simulate_with(
    args: SimulateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_simulation(&config)?;
    write_summary(writer, &summary)
}

pub(super) fn execute_simulation(config: &SimulateConfig) -> Result<SimulationSummary, CliError> {
    let oracle = LatencyRewardOracle::new(config.oracle_latency, config.seed);
    let engine = match &config.attractions {
        Some(path) => RewardEngine::new(oracle, load_attractions(path)?),
        None => RewardEngine::from_catalog(oracle, &BuiltinCatalog)
            .map_err(|source| CliError::BuildEngine { source })?,
    }
    .with_reward_radius(config.reward_radius_miles);
    let dispatcher =
        ConcurrentDispatcher::new(config.sizing).map_err(|source| CliError::Dispatch { source })?;
    let workers = dispatcher.workers();
    let orchestrator =
        BatchOrchestrator::new(engine, RandomLocationProvider::new(config.seed), dispatcher)
            .with_timeouts(config.timeouts);
    let registry = UserRegistry::from_users(seed_internal_users(config.users, config.seed));
    let guide = TourGuide::new(
        orchestrator,
        SimulatedTripPricer::new(config.seed),
        registry,
    );

    info!(
        "simulating {:?} batch for {} users on {workers} workers",
        config.mode, config.users
    );
    let counts = match config.mode {
        SimulationMode::Rewards => guide.reward_all_users().map(BatchCounts::from),
        SimulationMode::Track => guide.track_all_users().map(BatchCounts::from),
    }
    .map_err(|source| CliError::Dispatch { source })?;

    let users = guide.registry().all_users();
    let total_rewards = users.iter().map(|user| user.rewards().len()).sum();
    let total_reward_points = users
        .iter()
        .map(|user| user.journal().total_reward_points())
        .sum();

    Ok(SimulationSummary {
        mode: config.mode,
        users: users.len(),
        workers,
        succeeded: counts.succeeded,
        failed: counts.failed,
        elapsed_ms: u64::try_from(counts.elapsed.as_millis()).unwrap_or(u64::MAX),
        total_rewards,
        total_reward_points,
        failures: counts.failures,
    })
}

/// Loads a JSON array of [`Attraction`]s from disk.
pub(super) fn load_attractions(path: &Utf8Path) -> Result<Vec<Attraction>, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenAttractions {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseAttractions {
        path: path.to_path_buf(),
        source,
    })
}

fn write_summary(writer: &mut dyn Write, summary: &SimulationSummary) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(summary).map_err(CliError::SerializeSummary)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSummary)?;
    writer.write_all(b"\n").map_err(CliError::WriteSummary)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SimulateConfig, CliError> {
    let merged = SimulateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SimulateConfig::try_from(merged)
}
