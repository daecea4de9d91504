//! Bounded worker pool for independent per-user jobs.
//!
//! [`ConcurrentDispatcher`] runs a batch of [`Job`]s on a fixed number of
//! blocking worker threads and waits for all of them under a single
//! timeout. Every job is isolated: an error or a panic in one job is
//! recorded in the [`BatchReport`] and never affects the others.
//!
//! The dispatcher is synchronous at its surface. Internally it owns a Tokio
//! runtime whose blocking pool provides the workers, so callers need no
//! async runtime of their own and must not call it from inside one.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dispatcher;
mod error;
mod job;
mod report;
mod sizing;

pub use dispatcher::ConcurrentDispatcher;
pub use error::DispatchError;
pub use job::{Job, JobError};
pub use report::{BatchReport, JobCause, JobFailure};
pub use sizing::PoolSizing;
