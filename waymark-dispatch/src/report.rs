//! Outcome of a completed batch.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

use crate::JobError;

/// Why a single job did not produce a value.
#[derive(Debug, Error)]
pub enum JobCause {
    /// The job returned an error.
    #[error("failed: {0}")]
    Failed(#[source] JobError),
    /// The job panicked.
    #[error("panicked: {message}")]
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },
    /// The runtime shut down before the job ran.
    #[error("was cancelled")]
    Cancelled,
}

impl JobCause {
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| String::from("non-string panic payload"));
        Self::Panicked { message }
    }
}

/// A job that did not produce a value.
#[derive(Debug, Error)]
#[error("job {label} {cause}")]
pub struct JobFailure {
    /// Label of the failed job.
    pub label: String,
    /// What went wrong.
    #[source]
    pub cause: JobCause,
}

/// Values and failures collected from one batch.
///
/// Values keep the order in which their jobs were submitted.
#[derive(Debug)]
pub struct BatchReport<T> {
    outputs: Vec<T>,
    failures: Vec<JobFailure>,
    elapsed: Duration,
}

impl<T> BatchReport<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            outputs: Vec::with_capacity(capacity),
            failures: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn push_output(&mut self, value: T) {
        self.outputs.push(value);
    }

    pub(crate) fn push_failure(&mut self, failure: JobFailure) {
        self.failures.push(failure);
    }

    pub(crate) const fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Number of jobs in the batch.
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.outputs.len().saturating_add(self.failures.len())
    }

    /// Number of jobs that produced a value.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    /// Number of jobs that failed or panicked.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every job produced a value.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Values produced by successful jobs.
    #[must_use]
    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }

    /// Consume the report, keeping only the values.
    #[must_use]
    pub fn into_outputs(self) -> Vec<T> {
        self.outputs
    }

    /// Failed jobs.
    #[must_use]
    pub fn failures(&self) -> &[JobFailure] {
        &self.failures
    }

    /// Wall-clock time the batch took.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
