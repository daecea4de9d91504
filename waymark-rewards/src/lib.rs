//! Reward calculation for Waymark users.
//!
//! [`RewardEngine`] intersects each user's visited positions with the
//! attraction catalog and credits points, looked up from a
//! [`RewardOracle`](waymark_core::RewardOracle), for every attraction the
//! user came within the reward radius of. A user is never rewarded twice for
//! the same attraction.
//!
//! Two radii are kept apart on purpose: the reward radius (default
//! [`DEFAULT_REWARD_RADIUS_MILES`]) decides eligibility, while the much wider
//! [`ATTRACTION_VISIBILITY_RADIUS_MILES`] answers generic "is this attraction
//! around here" questions.
//!
//! # Examples
//!
//! ```
//! use uuid::Uuid;
//! use waymark_core::test_support::FixedRewardOracle;
//! use waymark_core::{Attraction, User, VisitedPosition, lat_lon};
//! use waymark_rewards::RewardEngine;
//!
//! let attractions = vec![Attraction::with_random_id("Museum", lat_lon(0.0, 0.0))];
//! let engine = RewardEngine::new(FixedRewardOracle::new(100), attractions);
//!
//! let user = User::new(Uuid::new_v4(), "jon", "000", "jon@waymark.test");
//! user.add_visited_position(VisitedPosition::now(user.id(), lat_lon(0.0, 0.0)));
//!
//! assert_eq!(engine.calculate_rewards(&user)?, 1);
//! assert_eq!(user.rewards().len(), 1);
//! # Ok::<(), waymark_rewards::RewardError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod error;

pub use engine::RewardEngine;
pub use error::RewardError;

/// Default radius, in miles, within which a visit earns a reward.
pub const DEFAULT_REWARD_RADIUS_MILES: f64 = 10.0;

/// Radius, in miles, used for generic attraction proximity checks.
pub const ATTRACTION_VISIBILITY_RADIUS_MILES: f64 = 200.0;

/// Number of attractions returned by nearby-attraction queries.
pub const NEARBY_ATTRACTION_COUNT: usize = 5;

#[cfg(test)]
mod tests;
