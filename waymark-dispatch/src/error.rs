//! Errors raised by the dispatcher itself, as opposed to its jobs.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`ConcurrentDispatcher`](crate::ConcurrentDispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker runtime could not be started.
    #[error("failed to build the dispatcher runtime")]
    Runtime {
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The batch did not finish before its deadline.
    ///
    /// Jobs still running keep running; their effects may land after this
    /// error is returned.
    #[error("batch exceeded {timeout:?}: {finished} of {submitted} jobs finished")]
    TimeoutExceeded {
        /// Deadline applied to the batch.
        timeout: Duration,
        /// Jobs that had finished when the deadline passed.
        finished: usize,
        /// Jobs submitted in the batch.
        submitted: usize,
    },
    /// Waiting for the batch failed for a reason other than the deadline.
    #[error("batch execution failed: {reason}")]
    BatchExecutionFailed {
        /// Description of the failure.
        reason: String,
    },
}
