//! Trip pricing inputs and outputs.

use uuid::Uuid;

/// Traveller preferences forwarded to the trip pricer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripPreferences {
    /// Number of adults travelling.
    pub adults: u32,
    /// Number of children travelling.
    pub children: u32,
    /// Length of the trip in days.
    pub trip_duration_days: u32,
    /// Number of tickets requested.
    pub ticket_quantity: u32,
}

impl Default for TripPreferences {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            trip_duration_days: 1,
            ticket_quantity: 1,
        }
    }
}

/// A single request to the trip pricer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripQuoteRequest {
    /// Traveller being quoted.
    pub user_id: Uuid,
    /// Traveller preferences.
    pub preferences: TripPreferences,
    /// Accumulated reward points, which the pricer may discount against.
    pub reward_points: u64,
}

/// A priced offer returned by the trip pricer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripDeal {
    /// Name of the travel provider.
    pub provider_name: String,
    /// Quoted price.
    pub price: f64,
    /// Provider-side identifier for the offer.
    pub trip_id: Uuid,
}
