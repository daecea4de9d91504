//! Per-user queries served on top of the batch orchestrator.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use waymark_core::{
    LocationProvider, NearbyAttraction, Reward, RewardOracle, TripDeal, TripPricer,
    TripQuoteRequest, User, VisitedPosition,
};
use waymark_dispatch::{BatchReport, DispatchError};
use waymark_rewards::NEARBY_ATTRACTION_COUNT;

use crate::{BatchOrchestrator, TourError, UserRegistry};

/// The tour-guide service: users, their positions, rewards and trip deals.
#[derive(Debug)]
pub struct TourGuide<O, L, P>
where
    O: RewardOracle + 'static,
    L: LocationProvider + 'static,
    P: TripPricer,
{
    orchestrator: BatchOrchestrator<O, L>,
    pricer: P,
    registry: UserRegistry,
}

impl<O, L, P> TourGuide<O, L, P>
where
    O: RewardOracle + 'static,
    L: LocationProvider + 'static,
    P: TripPricer,
{
    /// Compose the service.
    pub const fn new(
        orchestrator: BatchOrchestrator<O, L>,
        pricer: P,
        registry: UserRegistry,
    ) -> Self {
        Self {
            orchestrator,
            pricer,
            registry,
        }
    }

    /// Registered users.
    #[must_use]
    pub const fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// The orchestrator running batches for this service.
    #[must_use]
    pub const fn orchestrator(&self) -> &BatchOrchestrator<O, L> {
        &self.orchestrator
    }

    /// Snapshot of the user's rewards.
    #[must_use]
    pub fn user_rewards(&self, user: &User) -> Vec<Reward> {
        user.rewards()
    }

    /// The user's latest position, tracking them first if none is known.
    ///
    /// # Errors
    /// Returns [`TourError::Track`] when the user has no position and
    /// tracking fails.
    pub fn user_location(&self, user: &User) -> Result<VisitedPosition, TourError> {
        Ok(self.orchestrator.locate_user(user)?)
    }

    /// The attractions closest to `position`, priced for `user`.
    ///
    /// # Errors
    /// Returns [`TourError::Nearby`] when too few attractions are known or a
    /// reward lookup fails.
    pub fn nearby_attractions(
        &self,
        position: &VisitedPosition,
        user: &User,
    ) -> Result<Vec<NearbyAttraction>, TourError> {
        self.orchestrator
            .engine()
            .nearest_attractions(position.location, user.id(), NEARBY_ATTRACTION_COUNT)
            .map_err(|source| TourError::Nearby {
                user_id: user.id(),
                source,
            })
    }

    /// Quote trips against the user's accumulated points and remember the
    /// deals on the user.
    ///
    /// # Errors
    /// Returns [`TourError::Pricing`] when the pricer fails; the user's
    /// previous deals are kept in that case.
    pub fn trip_deals(&self, user: &User) -> Result<Vec<TripDeal>, TourError> {
        let request = TripQuoteRequest {
            user_id: user.id(),
            preferences: user.preferences().clone(),
            reward_points: user.journal().total_reward_points(),
        };
        let deals = self
            .pricer
            .price(&request)
            .map_err(|source| TourError::Pricing {
                user_id: user.id(),
                source,
            })?;
        debug!("{} trip deals for {}", deals.len(), user.user_name());
        user.journal().set_trip_deals(deals.clone());
        Ok(deals)
    }

    /// Track every registered user in one batch.
    ///
    /// # Errors
    /// Returns the dispatcher's error when the batch times out or cannot be
    /// run.
    pub fn track_all_users(&self) -> Result<BatchReport<VisitedPosition>, DispatchError> {
        self.orchestrator
            .track_all_users_positions(&self.registry.all_users())
    }

    /// Calculate rewards for every registered user in one batch.
    ///
    /// # Errors
    /// Returns the dispatcher's error when the batch times out or cannot be
    /// run.
    pub fn reward_all_users(&self) -> Result<BatchReport<usize>, DispatchError> {
        self.orchestrator
            .calculate_all_users_rewards(&self.registry.all_users())
    }

    /// Look a registered user up by name.
    #[must_use]
    pub fn user(&self, user_name: &str) -> Option<Arc<User>> {
        self.registry.user(user_name)
    }

    /// Stop background work, waiting at most `grace` for running jobs.
    pub fn shutdown(self, grace: Duration) {
        self.orchestrator.shutdown(grace);
    }
}
