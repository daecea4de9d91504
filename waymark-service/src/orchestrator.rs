//! Fan per-user work out across the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use log::info;
use uuid::Uuid;
use waymark_core::{Journal, LocationProvider, RewardOracle, User, VisitedPosition};
use waymark_dispatch::{BatchReport, ConcurrentDispatcher, DispatchError, Job};
use waymark_rewards::RewardEngine;

use crate::TrackError;

/// Deadlines applied to whole batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTimeouts {
    /// Ceiling for a bulk reward calculation.
    pub rewards: Duration,
    /// Ceiling for a bulk position refresh.
    pub tracking: Duration,
}

impl Default for BatchTimeouts {
    fn default() -> Self {
        Self {
            rewards: Duration::from_secs(20 * 60),
            tracking: Duration::from_secs(30 * 60),
        }
    }
}

impl BatchTimeouts {
    /// Apply the same deadline to both kinds of batch.
    #[must_use]
    pub const fn uniform(timeout: Duration) -> Self {
        Self {
            rewards: timeout,
            tracking: timeout,
        }
    }
}

/// Runs reward and tracking batches over many users.
///
/// Each user becomes one job labelled with the user name. A failing job is
/// reported in the returned [`BatchReport`] and leaves that user's state
/// unchanged; only batch-level failures surface as [`DispatchError`].
#[derive(Debug)]
pub struct BatchOrchestrator<O, L>
where
    O: RewardOracle + 'static,
    L: LocationProvider + 'static,
{
    engine: Arc<RewardEngine<O>>,
    locations: Arc<L>,
    dispatcher: ConcurrentDispatcher,
    timeouts: BatchTimeouts,
}

impl<O, L> BatchOrchestrator<O, L>
where
    O: RewardOracle + 'static,
    L: LocationProvider + 'static,
{
    /// Compose an orchestrator with default batch deadlines.
    pub fn new(engine: RewardEngine<O>, locations: L, dispatcher: ConcurrentDispatcher) -> Self {
        Self {
            engine: Arc::new(engine),
            locations: Arc::new(locations),
            dispatcher,
            timeouts: BatchTimeouts::default(),
        }
    }

    /// Override the batch deadlines.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: BatchTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The shared reward engine.
    #[must_use]
    pub fn engine(&self) -> &RewardEngine<O> {
        &self.engine
    }

    /// The location provider used for tracking.
    #[must_use]
    pub fn locations(&self) -> &L {
        &self.locations
    }

    /// The dispatcher running every batch.
    #[must_use]
    pub const fn dispatcher(&self) -> &ConcurrentDispatcher {
        &self.dispatcher
    }

    /// Deadlines currently applied.
    #[must_use]
    pub const fn timeouts(&self) -> BatchTimeouts {
        self.timeouts
    }

    /// Fetch the user's current position, record it and re-evaluate
    /// rewards, all under the user's lock.
    ///
    /// # Errors
    /// Returns [`TrackError::Location`] when the provider fails and
    /// [`TrackError::Reward`] when the reward pass fails; in the latter case
    /// the new position is discarded.
    pub fn track_user_location(&self, user: &User) -> Result<VisitedPosition, TrackError> {
        track_user(&self.engine, self.locations.as_ref(), user)
    }

    /// The user's latest position, tracking them first if none is known.
    ///
    /// The check and the tracking share one hold of the user's lock, so
    /// concurrent callers on a user without history record one position.
    ///
    /// # Errors
    /// Returns the same errors as [`track_user_location`](Self::track_user_location)
    /// when tracking is needed and fails.
    pub fn locate_user(&self, user: &User) -> Result<VisitedPosition, TrackError> {
        let mut journal = user.journal();
        if let Some(position) = journal.last_position() {
            return Ok(position.clone());
        }
        track_in(&self.engine, self.locations.as_ref(), user.id(), &mut journal)
    }

    /// Calculate rewards for every user in one batch.
    ///
    /// Report values are the number of rewards each successful user gained.
    ///
    /// # Errors
    /// Returns the dispatcher's error when the batch times out or cannot be
    /// run.
    pub fn calculate_all_users_rewards(
        &self,
        users: &[Arc<User>],
    ) -> Result<BatchReport<usize>, DispatchError> {
        info!("calculating rewards for {} users", users.len());
        let jobs = users
            .iter()
            .map(|shared| {
                let user = Arc::clone(shared);
                let engine = Arc::clone(&self.engine);
                Job::new(user.user_name().to_owned(), move || {
                    engine.calculate_rewards(&user)
                })
            })
            .collect();
        self.dispatcher.run_batch(jobs, self.timeouts.rewards)
    }

    /// Refresh every user's position in one batch, re-evaluating rewards
    /// for each new position.
    ///
    /// Report values are the new positions of the users tracked
    /// successfully.
    ///
    /// # Errors
    /// Returns the dispatcher's error when the batch times out or cannot be
    /// run.
    pub fn track_all_users_positions(
        &self,
        users: &[Arc<User>],
    ) -> Result<BatchReport<VisitedPosition>, DispatchError> {
        info!("tracking {} users", users.len());
        let jobs = users
            .iter()
            .map(|shared| {
                let user = Arc::clone(shared);
                let engine = Arc::clone(&self.engine);
                let locations = Arc::clone(&self.locations);
                Job::new(user.user_name().to_owned(), move || {
                    track_user(&engine, locations.as_ref(), &user)
                })
            })
            .collect();
        self.dispatcher.run_batch(jobs, self.timeouts.tracking)
    }

    /// Stop the dispatcher, waiting at most `grace` for running jobs.
    pub fn shutdown(self, grace: Duration) {
        self.dispatcher.shutdown(grace);
    }
}

fn track_user<O, L>(
    engine: &RewardEngine<O>,
    locations: &L,
    user: &User,
) -> Result<VisitedPosition, TrackError>
where
    O: RewardOracle,
    L: LocationProvider + ?Sized,
{
    let mut journal = user.journal();
    track_in(engine, locations, user.id(), &mut journal)
}

fn track_in<O, L>(
    engine: &RewardEngine<O>,
    locations: &L,
    user_id: Uuid,
    journal: &mut Journal,
) -> Result<VisitedPosition, TrackError>
where
    O: RewardOracle,
    L: LocationProvider + ?Sized,
{
    let position = locations
        .user_location(user_id)
        .map_err(|source| TrackError::Location { user_id, source })?;
    journal.push_position(position.clone());
    if let Err(source) = engine.calculate_rewards_in(user_id, journal) {
        journal.pop_position();
        return Err(TrackError::Reward { user_id, source });
    }
    Ok(position)
}
