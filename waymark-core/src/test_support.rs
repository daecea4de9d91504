//! Deterministic collaborators used by unit and behaviour tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use geo::Coord;
use uuid::Uuid;

use crate::{
    Attraction, AttractionCatalog, LocationProvider, ProviderError, RewardOracle, TripDeal,
    TripPricer, TripQuoteRequest, VisitedPosition,
};

/// Catalog returning a fixed attraction list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    attractions: Vec<Attraction>,
}

impl StaticCatalog {
    /// Create a catalog from a collection of attractions.
    pub fn with_attractions<I>(attractions: I) -> Self
    where
        I: IntoIterator<Item = Attraction>,
    {
        Self {
            attractions: attractions.into_iter().collect(),
        }
    }
}

impl AttractionCatalog for StaticCatalog {
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        Ok(self.attractions.clone())
    }
}

/// Reward oracle granting the same points for every lookup.
///
/// An optional delay simulates a slow remote service. Calls are counted so
/// tests can assert how often the oracle was consulted.
#[derive(Debug, Default)]
pub struct FixedRewardOracle {
    points: u32,
    delay: Duration,
    failing_users: HashSet<Uuid>,
    calls: AtomicUsize,
}

impl FixedRewardOracle {
    /// Oracle answering `points` for every attraction.
    #[must_use]
    pub fn new(points: u32) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every lookup made on behalf of `user_id`.
    #[must_use]
    pub fn failing_for(mut self, user_id: Uuid) -> Self {
        self.failing_users.insert(user_id);
        self
    }

    /// Number of lookups served so far, including failures.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RewardOracle for FixedRewardOracle {
    fn attraction_reward_points(
        &self,
        _attraction_id: Uuid,
        user_id: Uuid,
    ) -> Result<u32, ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.failing_users.contains(&user_id) {
            return Err(ProviderError::unavailable("reward oracle", "simulated outage"));
        }
        Ok(self.points)
    }
}

/// Location provider reporting the same coordinate for every user.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    location: Coord<f64>,
    failing_users: HashSet<Uuid>,
}

impl FixedLocationProvider {
    /// Provider placing every user at `location`.
    #[must_use]
    pub fn new(location: Coord<f64>) -> Self {
        Self {
            location,
            failing_users: HashSet::new(),
        }
    }

    /// Fail every lookup for `user_id`.
    #[must_use]
    pub fn failing_for(mut self, user_id: Uuid) -> Self {
        self.failing_users.insert(user_id);
        self
    }
}

impl LocationProvider for FixedLocationProvider {
    fn user_location(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        if self.failing_users.contains(&user_id) {
            return Err(ProviderError::UnknownUser { user_id });
        }
        Ok(VisitedPosition::now(user_id, self.location))
    }
}

/// Trip pricer returning canned deals and remembering the last request.
#[derive(Debug, Default)]
pub struct RecordingTripPricer {
    deals: Vec<TripDeal>,
    last_request: Mutex<Option<TripQuoteRequest>>,
}

impl RecordingTripPricer {
    /// Pricer answering every request with `deals`.
    #[must_use]
    pub fn with_deals(deals: Vec<TripDeal>) -> Self {
        Self {
            deals,
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<TripQuoteRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|request| (*request).clone())
    }
}

impl TripPricer for RecordingTripPricer {
    fn price(&self, request: &TripQuoteRequest) -> Result<Vec<TripDeal>, ProviderError> {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        Ok(self.deals.clone())
    }
}
