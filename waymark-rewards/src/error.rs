//! Error types raised while calculating rewards.
#![forbid(unsafe_code)]

use thiserror::Error;
use uuid::Uuid;
use waymark_core::ProviderError;

/// Errors raised by [`RewardEngine`](crate::RewardEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    /// The reward oracle failed to price an attraction.
    #[error("reward lookup for {attraction} failed for user {user_id}")]
    Oracle {
        /// Attraction being priced.
        attraction: String,
        /// User the lookup was made for.
        user_id: Uuid,
        /// Failure reported by the oracle.
        #[source]
        source: ProviderError,
    },
    /// The attraction catalog could not be loaded.
    #[error("failed to load the attraction catalog")]
    Catalog {
        /// Failure reported by the catalog.
        #[source]
        source: ProviderError,
    },
}
