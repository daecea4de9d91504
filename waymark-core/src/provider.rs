//! Boundaries to the services Waymark depends on.
//!
//! The traits are synchronous so batch jobs can call them from blocking
//! worker threads. Implementations must be `Send + Sync`: one instance is
//! shared by every worker, and calls for distinct users may arrive
//! concurrently.

use thiserror::Error;
use uuid::Uuid;

use crate::{Attraction, TripDeal, TripQuoteRequest, VisitedPosition};

/// Errors reported by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The service could not answer the request.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        /// Name of the failing service.
        service: &'static str,
        /// Description of the failure.
        message: String,
    },
    /// The service does not know the user.
    #[error("unknown user {user_id}")]
    UnknownUser {
        /// Identifier that was not recognised.
        user_id: Uuid,
    },
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Unavailable`].
    pub fn unavailable(service: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service,
            message: message.into(),
        }
    }
}

/// Report where a user currently is.
///
/// # Examples
///
/// ```rust
/// use uuid::Uuid;
/// use waymark_core::{LocationProvider, ProviderError, VisitedPosition, lat_lon};
///
/// struct AtOrigin;
///
/// impl LocationProvider for AtOrigin {
///     fn user_location(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
///         Ok(VisitedPosition::now(user_id, lat_lon(0.0, 0.0)))
///     }
/// }
///
/// let position = AtOrigin.user_location(Uuid::nil())?;
/// assert_eq!(position.location, lat_lon(0.0, 0.0));
/// # Ok::<(), ProviderError>(())
/// ```
pub trait LocationProvider: Send + Sync {
    /// Return the user's current position.
    fn user_location(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError>;
}

/// Look up how many points an attraction is worth to a user.
///
/// Calls may be slow; the oracle is assumed to be side-effect free.
pub trait RewardOracle: Send + Sync {
    /// Return the reward points for visiting `attraction_id`.
    fn attraction_reward_points(
        &self,
        attraction_id: Uuid,
        user_id: Uuid,
    ) -> Result<u32, ProviderError>;
}

/// Source of the attraction list, read once at start-up.
pub trait AttractionCatalog: Send + Sync {
    /// Return every known attraction.
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError>;
}

/// Quote trips for a traveller.
pub trait TripPricer: Send + Sync {
    /// Return the offers available for `request`.
    fn price(&self, request: &TripQuoteRequest) -> Result<Vec<TripDeal>, ProviderError>;
}

impl<T: LocationProvider + ?Sized> LocationProvider for std::sync::Arc<T> {
    fn user_location(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        (**self).user_location(user_id)
    }
}

impl<T: RewardOracle + ?Sized> RewardOracle for std::sync::Arc<T> {
    fn attraction_reward_points(
        &self,
        attraction_id: Uuid,
        user_id: Uuid,
    ) -> Result<u32, ProviderError> {
        (**self).attraction_reward_points(attraction_id, user_id)
    }
}

impl<T: AttractionCatalog + ?Sized> AttractionCatalog for std::sync::Arc<T> {
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        (**self).attractions()
    }
}

impl<T: TripPricer + ?Sized> TripPricer for std::sync::Arc<T> {
    fn price(&self, request: &TripQuoteRequest) -> Result<Vec<TripDeal>, ProviderError> {
        (**self).price(request)
    }
}
