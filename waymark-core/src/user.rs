//! Users, their visited positions and the rewards they have earned.
//!
//! Every [`User`] owns a [`Journal`] behind a mutex. Holding the journal
//! guard is the per-user serialization domain: position tracking and reward
//! calculation for one user never interleave, while different users proceed
//! in parallel.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use geo::Coord;
use uuid::Uuid;

use crate::{Attraction, TripDeal, TripPreferences};

/// A position a user was observed at.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisitedPosition {
    /// Owner of the position.
    pub user_id: Uuid,
    /// Where the user was.
    pub location: Coord<f64>,
    /// When the user was there.
    pub visited_at: DateTime<Utc>,
}

impl VisitedPosition {
    /// Construct a `VisitedPosition`.
    #[must_use]
    pub const fn new(user_id: Uuid, location: Coord<f64>, visited_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            visited_at,
        }
    }

    /// Construct a `VisitedPosition` stamped with the current time.
    #[must_use]
    pub fn now(user_id: Uuid, location: Coord<f64>) -> Self {
        Self::new(user_id, location, Utc::now())
    }
}

/// Points credited to a user for visiting an attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    /// The position that qualified for the reward.
    pub position: VisitedPosition,
    /// The rewarded attraction.
    pub attraction: Attraction,
    /// Points granted by the reward oracle.
    pub points: u32,
}

/// Mutable per-user state: visited positions, rewards and trip deals.
///
/// Positions keep their insertion order; the last one is the user's current
/// position. At most one reward exists per attraction name.
#[derive(Debug, Default)]
pub struct Journal {
    positions: Vec<VisitedPosition>,
    rewards: Vec<Reward>,
    trip_deals: Vec<TripDeal>,
}

impl Journal {
    /// Visited positions in the order they were recorded.
    #[must_use]
    pub fn positions(&self) -> &[VisitedPosition] {
        &self.positions
    }

    /// The most recently recorded position.
    #[must_use]
    pub fn last_position(&self) -> Option<&VisitedPosition> {
        self.positions.last()
    }

    /// Append a visited position.
    pub fn push_position(&mut self, position: VisitedPosition) {
        self.positions.push(position);
    }

    /// Remove and return the most recently recorded position.
    pub fn pop_position(&mut self) -> Option<VisitedPosition> {
        self.positions.pop()
    }

    /// Rewards earned so far.
    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// Whether a reward already exists for the named attraction.
    #[must_use]
    pub fn has_reward_for(&self, attraction_name: &str) -> bool {
        self.rewards
            .iter()
            .any(|reward| reward.attraction.name == attraction_name)
    }

    /// Names of every attraction the user has already been rewarded for.
    #[must_use]
    pub fn rewarded_attractions(&self) -> HashSet<String> {
        self.rewards
            .iter()
            .map(|reward| reward.attraction.name.clone())
            .collect()
    }

    /// Append a reward unless the attraction has already been rewarded.
    ///
    /// Returns `true` when the reward was recorded.
    pub fn push_reward(&mut self, reward: Reward) -> bool {
        if self.has_reward_for(&reward.attraction.name) {
            return false;
        }
        self.rewards.push(reward);
        true
    }

    /// Sum of all reward points earned.
    #[must_use]
    pub fn total_reward_points(&self) -> u64 {
        self.rewards
            .iter()
            .map(|reward| u64::from(reward.points))
            .sum()
    }

    /// Trip deals from the most recent quote.
    #[must_use]
    pub fn trip_deals(&self) -> &[TripDeal] {
        &self.trip_deals
    }

    /// Replace the stored trip deals.
    pub fn set_trip_deals(&mut self, deals: Vec<TripDeal>) {
        self.trip_deals = deals;
    }
}

/// A traveller tracked by the service.
///
/// Identity fields are immutable; everything that changes over time lives in
/// the [`Journal`], reachable through [`User::journal`].
///
/// # Examples
/// ```
/// use uuid::Uuid;
/// use waymark_core::{User, VisitedPosition, lat_lon};
///
/// let user = User::new(Uuid::new_v4(), "jon", "000", "jon@waymark.test");
/// user.add_visited_position(VisitedPosition::now(user.id(), lat_lon(1.0, 2.0)));
/// assert_eq!(user.visited_positions().len(), 1);
/// assert!(user.rewards().is_empty());
/// ```
#[derive(Debug)]
pub struct User {
    id: Uuid,
    user_name: String,
    phone_number: String,
    email_address: String,
    preferences: TripPreferences,
    journal: Mutex<Journal>,
}

impl User {
    /// Construct a user with default trip preferences and an empty journal.
    pub fn new(
        id: Uuid,
        user_name: impl Into<String>,
        phone_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            phone_number: phone_number.into(),
            email_address: email_address.into(),
            preferences: TripPreferences::default(),
            journal: Mutex::new(Journal::default()),
        }
    }

    /// Replace the trip preferences while returning `self` for chaining.
    #[must_use]
    pub fn with_preferences(mut self, preferences: TripPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Login name; unique within a registry.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Contact phone number.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Contact email address.
    #[must_use]
    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    /// Preferences used when quoting trips.
    #[must_use]
    pub const fn preferences(&self) -> &TripPreferences {
        &self.preferences
    }

    /// Lock the user's journal.
    ///
    /// A poisoned lock is recovered: every journal mutation is a single
    /// push or replace, so a panicking holder cannot leave it half-written.
    pub fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a visited position.
    pub fn add_visited_position(&self, position: VisitedPosition) {
        self.journal().push_position(position);
    }

    /// Snapshot of the visited positions.
    #[must_use]
    pub fn visited_positions(&self) -> Vec<VisitedPosition> {
        self.journal().positions().to_vec()
    }

    /// The most recently visited position, if any.
    #[must_use]
    pub fn last_visited_position(&self) -> Option<VisitedPosition> {
        self.journal().last_position().cloned()
    }

    /// Record a reward unless the attraction was already rewarded.
    pub fn add_reward(&self, reward: Reward) -> bool {
        self.journal().push_reward(reward)
    }

    /// Snapshot of the earned rewards.
    #[must_use]
    pub fn rewards(&self) -> Vec<Reward> {
        self.journal().rewards().to_vec()
    }

    /// Snapshot of the latest trip deals.
    #[must_use]
    pub fn trip_deals(&self) -> Vec<TripDeal> {
        self.journal().trip_deals().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lat_lon;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::new(Uuid::new_v4(), "internalUser0", "000", "internalUser0@waymark.test")
    }

    fn reward_for(user: &User, name: &str, points: u32) -> Reward {
        Reward {
            position: VisitedPosition::now(user.id(), lat_lon(0.0, 0.0)),
            attraction: Attraction::with_random_id(name, lat_lon(0.0, 0.0)),
            points,
        }
    }

    #[rstest]
    fn positions_keep_insertion_order(user: User) {
        user.add_visited_position(VisitedPosition::now(user.id(), lat_lon(1.0, 1.0)));
        user.add_visited_position(VisitedPosition::now(user.id(), lat_lon(2.0, 2.0)));
        let last = user.last_visited_position().expect("a position was recorded");
        assert_eq!(last.location, lat_lon(2.0, 2.0));
        assert_eq!(user.visited_positions().len(), 2);
    }

    #[rstest]
    fn duplicate_attraction_rewards_are_refused(user: User) {
        assert!(user.add_reward(reward_for(&user, "Museum", 10)));
        assert!(!user.add_reward(reward_for(&user, "Museum", 99)));
        let rewards = user.rewards();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards.first().map(|r| r.points), Some(10));
    }

    #[rstest]
    fn journal_totals_points(user: User) {
        user.add_reward(reward_for(&user, "Museum", 10));
        user.add_reward(reward_for(&user, "Zoo", 32));
        assert_eq!(user.journal().total_reward_points(), 42);
        assert_eq!(user.journal().rewarded_attractions().len(), 2);
    }

    #[rstest]
    fn pop_position_rolls_back_latest(user: User) {
        user.add_visited_position(VisitedPosition::now(user.id(), lat_lon(1.0, 1.0)));
        let mut journal = user.journal();
        journal.push_position(VisitedPosition::now(user.id(), lat_lon(2.0, 2.0)));
        let popped = journal.pop_position().expect("position to roll back");
        assert_eq!(popped.location, lat_lon(2.0, 2.0));
        assert_eq!(journal.positions().len(), 1);
    }
}
