//! Error types emitted by the Waymark CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymark_dispatch::DispatchError;
use waymark_rewards::RewardError;

/// Errors emitted by the Waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// An option holds a value the simulation cannot use.
    #[error("invalid {field}: {reason} (check --{field} or {env})")]
    InvalidArgument {
        field: &'static str,
        env: &'static str,
        reason: String,
    },
    /// Opening the attraction catalog file failed.
    #[error("failed to open attraction catalog at {path:?}: {source}")]
    OpenAttractions {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The attraction catalog JSON could not be decoded.
    #[error("failed to parse attraction catalog JSON at {path:?}: {source}")]
    ParseAttractions {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Building the reward engine failed.
    #[error("failed to build the reward engine: {source}")]
    BuildEngine {
        #[source]
        source: RewardError,
    },
    /// Starting the dispatcher or running the batch failed.
    #[error("batch failed: {source}")]
    Dispatch {
        #[source]
        source: DispatchError,
    },
    /// Serializing the simulation summary failed.
    #[error("failed to serialize simulation summary: {0}")]
    SerializeSummary(#[source] serde_json::Error),
    /// Writing the simulation summary failed.
    #[error("failed to write simulation summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
