use geo::Coord;
use uuid::Uuid;

/// A point of interest that can earn a visitor reward points.
///
/// Attractions are loaded once per process and shared read-only between
/// workers. Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use uuid::Uuid;
/// use waymark_core::{Attraction, lat_lon};
///
/// let attraction = Attraction::new(Uuid::nil(), "Disneyland", lat_lon(33.817_595, -117.922_008));
/// assert_eq!(attraction.name, "Disneyland");
/// assert_eq!(attraction.location.y, 33.817_595);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attraction {
    /// Stable identifier used when querying the reward oracle.
    pub id: Uuid,
    /// Display name; rewards are de-duplicated by this name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

impl Attraction {
    /// Construct an `Attraction`.
    pub fn new(id: Uuid, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }

    /// Construct an `Attraction` with a freshly generated identifier.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::{Attraction, lat_lon};
    ///
    /// let a = Attraction::with_random_id("Jackson Hole", lat_lon(43.582_767, -110.821_999));
    /// let b = Attraction::with_random_id("Jackson Hole", lat_lon(43.582_767, -110.821_999));
    /// assert_ne!(a.id, b.id);
    /// ```
    pub fn with_random_id(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self::new(Uuid::new_v4(), name, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lat_lon;

    #[test]
    fn attraction_keeps_axes() {
        let attraction = Attraction::new(Uuid::nil(), "Museum", lat_lon(10.0, 20.0));
        assert_eq!(attraction.location.y, 10.0);
        assert_eq!(attraction.location.x, 20.0);
    }
}
