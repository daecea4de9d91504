//! Error types for tracking and tour-guide queries.

use thiserror::Error;
use uuid::Uuid;
use waymark_core::{ProviderError, RankError};
use waymark_rewards::RewardError;

/// Errors raised while tracking a single user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The location provider could not place the user.
    #[error("failed to locate user {user_id}")]
    Location {
        /// User being tracked.
        user_id: Uuid,
        /// Failure reported by the location provider.
        #[source]
        source: ProviderError,
    },
    /// Re-evaluating rewards for the new position failed; the position was
    /// not kept.
    #[error("failed to reward user {user_id} for the new position")]
    Reward {
        /// User being tracked.
        user_id: Uuid,
        /// Failure reported by the reward engine.
        #[source]
        source: RewardError,
    },
}

/// Errors raised by [`TourGuide`](crate::TourGuide) queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// The user had no position and tracking them failed.
    #[error(transparent)]
    Track(#[from] TrackError),
    /// Ranking nearby attractions failed.
    #[error("failed to rank attractions near user {user_id}")]
    Nearby {
        /// User the query was made for.
        user_id: Uuid,
        /// Failure reported by the ranker.
        #[source]
        source: RankError,
    },
    /// The trip pricer could not quote the user.
    #[error("failed to price trips for user {user_id}")]
    Pricing {
        /// User being quoted.
        user_id: Uuid,
        /// Failure reported by the pricer.
        #[source]
        source: ProviderError,
    },
}
