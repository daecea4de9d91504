//! `RewardEngine` implementation.
//!
//! A reward pass runs under the user's journal lock and is all-or-nothing:
//! new rewards are staged while positions are scanned and only committed
//! once every oracle lookup has succeeded.

use std::sync::Arc;

use geo::Coord;
use log::debug;
use uuid::Uuid;
use waymark_core::{
    Attraction, AttractionCatalog, Journal, NearbyAttraction, RankError, Reward, RewardOracle,
    User, VisitedPosition, is_near, nearest_attractions,
};

use crate::{ATTRACTION_VISIBILITY_RADIUS_MILES, DEFAULT_REWARD_RADIUS_MILES, RewardError};

/// Credits users for the attractions they visit.
///
/// The engine owns the attraction list for the life of the process and is
/// shared read-only between workers; it is `Send + Sync` whenever the oracle
/// is.
#[derive(Debug)]
pub struct RewardEngine<O>
where
    O: RewardOracle,
{
    oracle: O,
    attractions: Arc<[Attraction]>,
    reward_radius_miles: f64,
}

impl<O> RewardEngine<O>
where
    O: RewardOracle,
{
    /// Construct an engine over a fixed attraction list.
    pub fn new(oracle: O, attractions: impl Into<Arc<[Attraction]>>) -> Self {
        Self {
            oracle,
            attractions: attractions.into(),
            reward_radius_miles: DEFAULT_REWARD_RADIUS_MILES,
        }
    }

    /// Construct an engine by reading the catalog once.
    ///
    /// # Errors
    /// Returns [`RewardError::Catalog`] when the catalog cannot be read.
    pub fn from_catalog<C>(oracle: O, catalog: &C) -> Result<Self, RewardError>
    where
        C: AttractionCatalog + ?Sized,
    {
        let attractions = catalog
            .attractions()
            .map_err(|source| RewardError::Catalog { source })?;
        debug!("loaded {} attractions", attractions.len());
        Ok(Self::new(oracle, attractions))
    }

    /// Override the reward-eligibility radius.
    #[must_use]
    pub const fn with_reward_radius(mut self, miles: f64) -> Self {
        self.reward_radius_miles = miles;
        self
    }

    /// Radius, in miles, within which a visit earns a reward.
    #[must_use]
    pub const fn reward_radius_miles(&self) -> f64 {
        self.reward_radius_miles
    }

    /// The attraction list every pass scans.
    #[must_use]
    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    /// The reward oracle backing point lookups.
    #[must_use]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Whether `location` is within the wide visibility radius of `attraction`.
    #[must_use]
    pub fn is_within_attraction_proximity(
        &self,
        attraction: &Attraction,
        location: Coord<f64>,
    ) -> bool {
        is_near(
            location,
            attraction.location,
            ATTRACTION_VISIBILITY_RADIUS_MILES,
        )
    }

    /// Whether `position` qualifies for a reward at `attraction`.
    #[must_use]
    pub fn near_attraction(&self, position: &VisitedPosition, attraction: &Attraction) -> bool {
        is_near(
            position.location,
            attraction.location,
            self.reward_radius_miles,
        )
    }

    /// Points `user_id` would earn at `attraction`.
    ///
    /// # Errors
    /// Returns [`RewardError::Oracle`] when the oracle fails.
    pub fn reward_points(&self, attraction: &Attraction, user_id: Uuid) -> Result<u32, RewardError> {
        self.oracle
            .attraction_reward_points(attraction.id, user_id)
            .map_err(|source| RewardError::Oracle {
                attraction: attraction.name.clone(),
                user_id,
                source,
            })
    }

    /// Credit `user` for every newly reached attraction.
    ///
    /// Locks the user's journal for the whole pass. Returns the number of
    /// rewards added.
    ///
    /// # Errors
    /// Returns [`RewardError::Oracle`] when a lookup fails; no reward from
    /// the pass is recorded in that case.
    pub fn calculate_rewards(&self, user: &User) -> Result<usize, RewardError> {
        let mut journal = user.journal();
        self.calculate_rewards_in(user.id(), &mut journal)
    }

    /// Credit rewards into a journal the caller has already locked.
    ///
    /// Positions are visited in insertion order, so when several positions
    /// reach the same attraction the earliest one is credited.
    ///
    /// # Errors
    /// Returns [`RewardError::Oracle`] when a lookup fails; the journal is
    /// left untouched in that case.
    pub fn calculate_rewards_in(
        &self,
        user_id: Uuid,
        journal: &mut Journal,
    ) -> Result<usize, RewardError> {
        let mut rewarded = journal.rewarded_attractions();
        let mut earned = Vec::new();

        for position in journal.positions() {
            for attraction in self.attractions.iter() {
                if rewarded.contains(&attraction.name) || !self.near_attraction(position, attraction)
                {
                    continue;
                }
                let points = self.reward_points(attraction, user_id)?;
                rewarded.insert(attraction.name.clone());
                earned.push(Reward {
                    position: position.clone(),
                    attraction: attraction.clone(),
                    points,
                });
            }
        }

        let mut added = 0;
        for reward in earned {
            if journal.push_reward(reward) {
                added += 1;
            }
        }
        if added > 0 {
            debug!("user {user_id} earned {added} new rewards");
        }
        Ok(added)
    }

    /// The `k` attractions closest to `location`, priced for `user_id`.
    ///
    /// # Errors
    /// Returns [`RankError::InsufficientData`] when fewer than `k`
    /// attractions are known and [`RankError::Reward`] when a lookup fails.
    pub fn nearest_attractions(
        &self,
        location: Coord<f64>,
        user_id: Uuid,
        k: usize,
    ) -> Result<Vec<NearbyAttraction>, RankError> {
        nearest_attractions(location, &self.attractions, k, |attraction| {
            self.oracle
                .attraction_reward_points(attraction.id, user_id)
        })
    }
}
