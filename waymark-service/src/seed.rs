//! Internal users for local runs and load tests.
//!
//! Seeded users follow a fixed naming scheme (`internalUser0`,
//! `internalUser1`, ...) and start with three random visited positions.
//! The same seed always yields the same users.

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::{Builder, Uuid};
use waymark_core::{User, VisitedPosition, lat_lon};

/// Largest latitude produced, the Web Mercator limit.
pub const MAX_SEEDED_LATITUDE: f64 = 85.051_128_78;

/// Visited positions given to each seeded user.
pub const SEEDED_POSITIONS_PER_USER: usize = 3;

const HISTORY_WINDOW_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create `count` internal users with positions stamped relative to now.
///
/// # Examples
/// ```
/// use waymark_service::seed_internal_users;
///
/// let users = seed_internal_users(2, 7);
/// assert_eq!(users[1].user_name(), "internalUser1");
/// assert_eq!(users[1].visited_positions().len(), 3);
/// ```
#[must_use]
pub fn seed_internal_users(count: usize, seed: u64) -> Vec<User> {
    seed_internal_users_at(count, seed, Utc::now())
}

/// Create `count` internal users with positions stamped up to 30 days
/// before `now`.
#[must_use]
pub fn seed_internal_users_at(count: usize, seed: u64, now: DateTime<Utc>) -> Vec<User> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let user_name = format!("internalUser{index}");
            let email = format!("{user_name}@waymark.test");
            let user = User::new(random_id(&mut rng), user_name, "000", email);
            for _ in 0..SEEDED_POSITIONS_PER_USER {
                user.add_visited_position(random_position(&mut rng, user.id(), now));
            }
            user
        })
        .collect()
}

fn random_id(rng: &mut ChaCha8Rng) -> Uuid {
    Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

fn random_position(rng: &mut ChaCha8Rng, user_id: Uuid, now: DateTime<Utc>) -> VisitedPosition {
    let latitude = rng.gen_range(-MAX_SEEDED_LATITUDE..=MAX_SEEDED_LATITUDE);
    let longitude = rng.gen_range(-180.0..=180.0);
    let age = TimeDelta::try_seconds(rng.gen_range(0..HISTORY_WINDOW_SECONDS))
        .unwrap_or_else(TimeDelta::zero);
    let visited_at = now.checked_sub_signed(age).unwrap_or(now);
    VisitedPosition::new(user_id, lat_lon(latitude, longitude), visited_at)
}
