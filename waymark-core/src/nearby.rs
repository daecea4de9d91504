//! Rank attractions by distance from a position.

use geo::Coord;
use thiserror::Error;

use crate::{Attraction, ProviderError, distance_miles};

/// One entry of a nearest-attractions answer.
///
/// Carries both the attraction's coordinate and the query coordinate so
/// callers can render the pair without another lookup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NearbyAttraction {
    /// Name of the attraction.
    pub attraction_name: String,
    /// Where the attraction is.
    pub attraction_location: Coord<f64>,
    /// Where the query was made from.
    pub query_location: Coord<f64>,
    /// Great-circle distance between the two, in miles.
    pub distance_miles: f64,
    /// Points the user would earn for visiting.
    pub reward_points: u32,
}

/// Errors returned by [`nearest_attractions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// Fewer attractions exist than were requested.
    #[error("requested {requested} nearest attractions but only {available} are known")]
    InsufficientData {
        /// Number of attractions asked for.
        requested: usize,
        /// Number of attractions supplied.
        available: usize,
    },
    /// Looking up reward points for a selected attraction failed.
    #[error("failed to look up reward points for {attraction}")]
    Reward {
        /// Attraction whose points could not be fetched.
        attraction: String,
        /// Failure reported by the reward lookup.
        #[source]
        source: ProviderError,
    },
}

/// Select the `k` attractions closest to `point`.
///
/// Attractions are ordered by ascending distance; ties keep their input
/// order. Reward points are looked up only for the selected attractions.
///
/// # Errors
/// Returns [`RankError::InsufficientData`] when fewer than `k` attractions
/// are supplied, and [`RankError::Reward`] when `reward_points` fails.
///
/// # Examples
/// ```
/// use uuid::Uuid;
/// use waymark_core::{Attraction, lat_lon, nearest_attractions};
///
/// let attractions = vec![
///     Attraction::new(Uuid::nil(), "Far", lat_lon(10.0, 0.0)),
///     Attraction::new(Uuid::nil(), "Near", lat_lon(1.0, 0.0)),
/// ];
/// let nearest = nearest_attractions(lat_lon(0.0, 0.0), &attractions, 1, |_| Ok(7))?;
/// assert_eq!(nearest[0].attraction_name, "Near");
/// assert_eq!(nearest[0].reward_points, 7);
/// # Ok::<(), waymark_core::RankError>(())
/// ```
pub fn nearest_attractions<F>(
    point: Coord<f64>,
    attractions: &[Attraction],
    k: usize,
    mut reward_points: F,
) -> Result<Vec<NearbyAttraction>, RankError>
where
    F: FnMut(&Attraction) -> Result<u32, ProviderError>,
{
    if attractions.is_empty() || attractions.len() < k {
        return Err(RankError::InsufficientData {
            requested: k,
            available: attractions.len(),
        });
    }

    let mut ranked: Vec<(f64, &Attraction)> = attractions
        .iter()
        .map(|attraction| (distance_miles(point, attraction.location), attraction))
        .collect();
    // `sort_by` is stable, so equidistant attractions keep catalog order.
    ranked.sort_by(|(left, _), (right, _)| left.total_cmp(right));

    ranked
        .into_iter()
        .take(k)
        .map(|(distance, attraction)| {
            let points = reward_points(attraction).map_err(|source| RankError::Reward {
                attraction: attraction.name.clone(),
                source,
            })?;
            Ok(NearbyAttraction {
                attraction_name: attraction.name.clone(),
                attraction_location: attraction.location,
                query_location: point,
                distance_miles: distance,
                reward_points: points,
            })
        })
        .collect()
}
