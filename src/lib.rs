//! Facade crate for the Waymark reward engine.
//!
//! This crate re-exports the domain types, the reward engine and the
//! concurrent dispatcher. The tour-guide service and its simulated
//! collaborators sit behind the `service` feature.

#![forbid(unsafe_code)]

pub use waymark_core::{
    Attraction, AttractionCatalog, Journal, LocationProvider, NearbyAttraction, ProviderError,
    RankError, Reward, RewardOracle, TripDeal, TripPreferences, TripPricer, TripQuoteRequest,
    User, VisitedPosition, distance_miles, is_near, lat_lon, nearest_attractions,
};

pub use waymark_rewards::{
    ATTRACTION_VISIBILITY_RADIUS_MILES, DEFAULT_REWARD_RADIUS_MILES, NEARBY_ATTRACTION_COUNT,
    RewardEngine, RewardError,
};

pub use waymark_dispatch::{
    BatchReport, ConcurrentDispatcher, DispatchError, Job, JobCause, JobError, JobFailure,
    PoolSizing,
};

#[cfg(feature = "service")]
pub use waymark_service::{
    BatchOrchestrator, BatchTimeouts, TourError, TourGuide, TrackError, UserRegistry,
    seed_internal_users, simulation,
};
