//! Stand-in collaborators for running batches without external services.
//!
//! [`BuiltinCatalog`] serves a fixed set of well-known US attractions,
//! [`RandomLocationProvider`] places users anywhere on the map,
//! [`LatencyRewardOracle`] answers after an artificial delay and
//! [`SimulatedTripPricer`] quotes a handful of made-up providers.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::{Builder, Uuid};
use waymark_core::{
    Attraction, AttractionCatalog, LocationProvider, ProviderError, RewardOracle, TripDeal,
    TripPricer, TripQuoteRequest, VisitedPosition, lat_lon,
};

use crate::seed::MAX_SEEDED_LATITUDE;

const BUILTIN_ATTRACTIONS: [(&str, f64, f64); 26] = [
    ("Disneyland", 33.817_595, -117.922_008),
    ("Jackson Hole", 43.582_767, -110.821_999),
    ("Mojave National Preserve", 35.141_689, -115.510_399),
    ("Joshua Tree National Park", 33.881_866, -115.900_65),
    ("Buffalo National River", 35.985_512, -92.757_652),
    ("Hot Springs National Park", 34.521_53, -93.042_267),
    ("Kartchner Caverns State Park", 31.837_551, -110.347_382),
    ("Legend Valley", 39.937_778, -82.406_67),
    ("Golden Gate Bridge", 37.819_929, -122.478_255),
    ("McKinley Tower", 61.218_887, -149.877_502),
    ("Flatiron Building", 40.741_112, -73.989_723),
    ("Fallingwater", 39.906_113, -79.468_056),
    ("Union Station", 38.897_095, -77.006_332),
    ("Roger Dean Stadium", 26.890_959, -80.116_577),
    ("Texas Memorial Stadium", 30.283_682, -97.732_536),
    ("Bryant-Denny Stadium", 33.208_973, -87.550_438),
    ("Tiger Stadium", 30.412_035, -91.183_815),
    ("Neyland Stadium", 35.955_013, -83.925_011),
    ("Kyle Field", 30.610_25, -96.339_844),
    ("San Diego Zoo", 32.735_317, -117.149_048),
    ("Zoo Tampa at Lowry Park", 28.012_804, -82.469_269),
    ("Franklin Park Zoo", 42.302_601, -71.086_731),
    ("El Paso Zoo", 31.769_125, -106.444_87),
    ("Kansas City Zoo", 39.007_504, -94.529_625),
    ("Bronx Zoo", 40.852_905, -73.872_971),
    ("Cinderella Castle", 28.419_411, -81.581_2),
];

const TRIP_PROVIDERS: [&str; 5] = [
    "Holiday Travels",
    "Enterprize Ventures Limited",
    "Sunny Days",
    "FlyAway Trips",
    "United Partners Vacations",
];

/// The built-in attraction list.
///
/// Identifiers are derived from each attraction's position in the list, so
/// they are stable between runs.
#[must_use]
pub fn builtin_attractions() -> Vec<Attraction> {
    BUILTIN_ATTRACTIONS
        .iter()
        .zip(1_u128..)
        .map(|(&(name, latitude, longitude), index)| {
            Attraction::new(Uuid::from_u128(index), name, lat_lon(latitude, longitude))
        })
        .collect()
}

/// Catalog serving [`builtin_attractions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl AttractionCatalog for BuiltinCatalog {
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        Ok(builtin_attractions())
    }
}

fn seeded(seed: u64) -> Mutex<ChaCha8Rng> {
    Mutex::new(ChaCha8Rng::seed_from_u64(seed))
}

/// Location provider reporting a random position on every call.
#[derive(Debug)]
pub struct RandomLocationProvider {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomLocationProvider {
    /// Provider drawing positions from a generator seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: seeded(seed) }
    }
}

impl LocationProvider for RandomLocationProvider {
    fn user_location(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let latitude = rng.gen_range(-MAX_SEEDED_LATITUDE..=MAX_SEEDED_LATITUDE);
        let longitude = rng.gen_range(-180.0..=180.0);
        Ok(VisitedPosition::now(user_id, lat_lon(latitude, longitude)))
    }
}

/// Reward oracle that sleeps before answering with random points.
///
/// Points fall in `1..=1000`.
#[derive(Debug)]
pub struct LatencyRewardOracle {
    latency: Duration,
    rng: Mutex<ChaCha8Rng>,
}

impl LatencyRewardOracle {
    /// Oracle answering after `latency`.
    #[must_use]
    pub fn new(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            rng: seeded(seed),
        }
    }

    /// The artificial delay applied to every lookup.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl RewardOracle for LatencyRewardOracle {
    fn attraction_reward_points(
        &self,
        _attraction_id: Uuid,
        _user_id: Uuid,
    ) -> Result<u32, ProviderError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rng.gen_range(1..=1000))
    }
}

/// Trip pricer quoting every provider in a fixed list.
///
/// Prices shrink as the traveller's reward points grow, never below zero.
#[derive(Debug)]
pub struct SimulatedTripPricer {
    rng: Mutex<ChaCha8Rng>,
}

impl SimulatedTripPricer {
    /// Pricer drawing base prices from a generator seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: seeded(seed) }
    }
}

impl TripPricer for SimulatedTripPricer {
    #[expect(
        clippy::float_arithmetic,
        reason = "prices are computed in floating point"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "point totals are far below f64's exact integer range"
    )]
    fn price(&self, request: &TripQuoteRequest) -> Result<Vec<TripDeal>, ProviderError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let travellers = f64::from(request.preferences.adults)
            + 0.5 * f64::from(request.preferences.children);
        let nights = f64::from(request.preferences.trip_duration_days);
        let discount = request.reward_points as f64 / 100.0;
        Ok(TRIP_PROVIDERS
            .iter()
            .map(|provider| {
                let base: f64 = rng.gen_range(100.0..1_000.0);
                TripDeal {
                    provider_name: (*provider).to_owned(),
                    price: (base * travellers * nights - discount).max(0.0),
                    trip_id: Builder::from_random_bytes(rng.r#gen()).into_uuid(),
                }
            })
            .collect())
    }
}
