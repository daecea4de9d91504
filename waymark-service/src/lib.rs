//! Batch orchestration and the tour-guide service surface.
//!
//! [`BatchOrchestrator`] turns a list of users into one dispatcher job per
//! user, for reward calculation or for position tracking.
//! [`TourGuide`] layers per-user queries (current location, nearby
//! attractions, trip deals) over an orchestrator and a [`UserRegistry`].
//!
//! The [`seed`] and [`simulation`] modules provide internal users and
//! stand-in collaborators so a whole batch can run without external
//! services.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod orchestrator;
mod registry;
pub mod seed;
pub mod simulation;
mod tour;

pub use error::{TourError, TrackError};
pub use orchestrator::{BatchOrchestrator, BatchTimeouts};
pub use registry::UserRegistry;
pub use seed::seed_internal_users;
pub use tour::TourGuide;
