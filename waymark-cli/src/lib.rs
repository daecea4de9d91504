//! Command-line interface for running Waymark batches locally.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod simulate;

pub use error::CliError;
use simulate::{SimulateArgs, run_simulate};

pub(crate) const ARG_USERS: &str = "users";
pub(crate) const ARG_MODE: &str = "mode";
pub(crate) const ARG_REWARD_RADIUS: &str = "reward-radius-miles";
pub(crate) const ARG_MIN_WORKERS: &str = "min-workers";
pub(crate) const ARG_WORKERS_PER_CPU: &str = "workers-per-cpu";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_ORACLE_LATENCY_MS: &str = "oracle-latency-ms";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_ATTRACTIONS: &str = "attractions";
pub(crate) const ENV_USERS: &str = "WAYMARK_CMDS_SIMULATE_USERS";
pub(crate) const ENV_REWARD_RADIUS: &str = "WAYMARK_CMDS_SIMULATE_REWARD_RADIUS_MILES";
pub(crate) const ENV_TIMEOUT_SECS: &str = "WAYMARK_CMDS_SIMULATE_TIMEOUT_SECS";

/// Run the Waymark CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Simulate(args) => run_simulate(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Run Waymark reward and tracking batches against simulated services",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seed internal users and run one batch over them.
    Simulate(SimulateArgs),
}

#[cfg(test)]
mod tests;
