//! Worker-count policy.

use std::num::NonZeroUsize;
use std::thread;

/// How many workers a dispatcher starts.
///
/// The pool grows with the host: `cpus * workers_per_cpu`, but never below
/// `minimum_workers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizing {
    /// Lower bound on the worker count.
    pub minimum_workers: usize,
    /// Workers started per available CPU.
    pub workers_per_cpu: usize,
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self {
            minimum_workers: 50,
            workers_per_cpu: 10,
        }
    }
}

impl PoolSizing {
    /// Worker count for a host with `cpus` CPUs. Always at least one.
    ///
    /// # Examples
    /// ```
    /// use waymark_dispatch::PoolSizing;
    ///
    /// let sizing = PoolSizing::default();
    /// assert_eq!(sizing.workers_for(2), 50);
    /// assert_eq!(sizing.workers_for(16), 160);
    /// ```
    #[must_use]
    pub const fn workers_for(&self, cpus: usize) -> usize {
        let scaled = cpus.saturating_mul(self.workers_per_cpu);
        let workers = if scaled > self.minimum_workers {
            scaled
        } else {
            self.minimum_workers
        };
        if workers == 0 { 1 } else { workers }
    }

    /// Worker count for the current host.
    #[must_use]
    pub fn workers(&self) -> usize {
        let cpus = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        self.workers_for(cpus)
    }
}
