//! `ConcurrentDispatcher` implementation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::{BatchReport, DispatchError, Job, JobCause, JobError, JobFailure, PoolSizing};

/// Counts a job as finished when dropped, including by unwinding.
struct Completion(Arc<AtomicUsize>);

impl Drop for Completion {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Runs batches of independent jobs on a bounded set of worker threads.
///
/// At most [`workers`](Self::workers) jobs run at once; the rest queue until
/// a worker frees up. The dispatcher is created once and reused for every
/// batch.
///
/// # Runtime behaviour
///
/// Workers are the blocking pool of a Tokio runtime owned by the
/// dispatcher. [`run_batch`](Self::run_batch) blocks the calling thread on
/// that runtime, so it must not be called from inside another Tokio
/// runtime; doing so returns [`DispatchError::BatchExecutionFailed`].
///
/// Dropping the dispatcher waits for running jobs. Use
/// [`shutdown`](Self::shutdown) to bound that wait.
pub struct ConcurrentDispatcher {
    runtime: Runtime,
    workers: usize,
}

impl fmt::Debug for ConcurrentDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentDispatcher")
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("workers", &self.workers)
            .finish()
    }
}

impl ConcurrentDispatcher {
    /// Start a dispatcher sized for the current host.
    ///
    /// # Errors
    /// Returns [`DispatchError::Runtime`] when the worker runtime cannot be
    /// built.
    pub fn new(sizing: PoolSizing) -> Result<Self, DispatchError> {
        Self::with_workers(sizing.workers())
    }

    /// Start a dispatcher with an explicit worker count.
    ///
    /// A count of zero is raised to one.
    ///
    /// # Errors
    /// Returns [`DispatchError::Runtime`] when the worker runtime cannot be
    /// built.
    pub fn with_workers(requested: usize) -> Result<Self, DispatchError> {
        let workers = requested.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(workers)
            .thread_name("waymark-dispatch")
            .enable_time()
            .build()
            .map_err(|source| DispatchError::Runtime { source })?;
        info!("dispatcher started with {workers} workers");
        Ok(Self { runtime, workers })
    }

    /// Maximum number of jobs that run at the same time.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Run every job and wait for all of them, at most `timeout`.
    ///
    /// Job errors and panics are collected into the report; they never
    /// abort the batch. Values appear in submission order.
    ///
    /// # Errors
    /// Returns [`DispatchError::TimeoutExceeded`] when the batch is not done
    /// by the deadline. Unfinished jobs are not cancelled: they keep
    /// running and their side effects may land later.
    ///
    /// Returns [`DispatchError::BatchExecutionFailed`] when called from
    /// inside a Tokio runtime.
    pub fn run_batch<T>(
        &self,
        jobs: Vec<Job<T>>,
        timeout: Duration,
    ) -> Result<BatchReport<T>, DispatchError>
    where
        T: Send + 'static,
    {
        if Handle::try_current().is_ok() {
            return Err(DispatchError::BatchExecutionFailed {
                reason: String::from("run_batch called from inside an async runtime"),
            });
        }

        let submitted = jobs.len();
        let finished = Arc::new(AtomicUsize::new(0));
        let started = Instant::now();
        let handles: Vec<(String, JoinHandle<Result<T, JobError>>)> = jobs
            .into_iter()
            .map(|job| {
                let (label, work) = job.into_parts();
                let completion = Completion(Arc::clone(&finished));
                let handle = self.runtime.spawn_blocking(move || {
                    let _completion = completion;
                    work()
                });
                (label, handle)
            })
            .collect();

        let collect = async move {
            let mut report = BatchReport::with_capacity(submitted);
            for (label, handle) in handles {
                match handle.await {
                    Ok(Ok(value)) => report.push_output(value),
                    Ok(Err(source)) => {
                        warn!("job {label} failed: {source}");
                        report.push_failure(JobFailure {
                            label,
                            cause: JobCause::Failed(source),
                        });
                    }
                    Err(join_error) => {
                        let cause = if join_error.is_panic() {
                            let payload = join_error.into_panic();
                            JobCause::from_panic(&*payload)
                        } else {
                            JobCause::Cancelled
                        };
                        warn!("job {label} {cause}");
                        report.push_failure(JobFailure { label, cause });
                    }
                }
            }
            report
        };

        // The deadline timer must be created on the runtime, not the caller.
        match self
            .runtime
            .block_on(async move { tokio::time::timeout(timeout, collect).await })
        {
            Ok(mut report) => {
                report.set_elapsed(started.elapsed());
                info!(
                    "batch of {submitted} jobs finished in {:?}: {} succeeded, {} failed",
                    report.elapsed(),
                    report.succeeded(),
                    report.failed()
                );
                Ok(report)
            }
            Err(_) => {
                let done = finished.load(Ordering::Relaxed);
                error!("batch of {submitted} jobs exceeded {timeout:?} with {done} finished");
                Err(DispatchError::TimeoutExceeded {
                    timeout,
                    finished: done,
                    submitted,
                })
            }
        }
    }

    /// Stop the workers, waiting at most `grace` for running jobs.
    pub fn shutdown(self, grace: Duration) {
        info!("dispatcher shutting down");
        self.runtime.shutdown_timeout(grace);
    }
}
