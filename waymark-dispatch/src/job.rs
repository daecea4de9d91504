//! A unit of work submitted to the dispatcher.

use std::fmt;

/// Error type produced by a failed job.
pub type JobError = Box<dyn std::error::Error + Send + Sync + 'static>;

type Work<T> = Box<dyn FnOnce() -> Result<T, JobError> + Send + 'static>;

/// A labelled closure run once on a worker thread.
///
/// The label identifies the job in failure reports and logs; batch code
/// uses the user name.
pub struct Job<T> {
    label: String,
    work: Work<T>,
}

impl<T> Job<T>
where
    T: Send + 'static,
{
    /// Wrap `work` as a job.
    ///
    /// # Examples
    /// ```
    /// use waymark_dispatch::Job;
    ///
    /// let job = Job::new("answer", || Ok::<_, std::io::Error>(42));
    /// assert_eq!(job.label(), "answer");
    /// ```
    pub fn new<F, E>(label: impl Into<String>, work: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<JobError> + 'static,
    {
        Self {
            label: label.into(),
            work: Box::new(move || work().map_err(Into::into)),
        }
    }

    /// The job's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn into_parts(self) -> (String, Work<T>) {
        (self.label, self.work)
    }
}

impl<T> fmt::Debug for Job<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
