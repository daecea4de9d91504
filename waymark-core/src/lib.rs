//! Core domain types for the Waymark reward engine.
//!
//! The crate holds the pieces every other Waymark crate agrees on: the
//! attraction and user model, great-circle distance and proximity checks,
//! nearest-attraction ranking, and the traits describing the external
//! services (location provider, reward oracle, attraction catalog and trip
//! pricer).
//!
//! Coordinates are [`geo::Coord`] values in WGS84 degrees with
//! `x = longitude` and `y = latitude`; use [`lat_lon`] to build one without
//! mixing up the axes.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attraction;
pub mod geodesy;
mod nearby;
pub mod provider;
mod trip;
mod user;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use attraction::Attraction;
pub use geodesy::{distance_miles, is_near, lat_lon};
pub use nearby::{NearbyAttraction, RankError, nearest_attractions};
pub use provider::{AttractionCatalog, LocationProvider, ProviderError, RewardOracle, TripPricer};
pub use trip::{TripDeal, TripPreferences, TripQuoteRequest};
pub use user::{Journal, Reward, User, VisitedPosition};
