// Location domain model
use serde::{Deserialize, Serialize};

/// A point on the map. Equality is exact numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A named location shown on the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellKnownPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl WellKnownPoint {
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Name shown when the reverse lookup has nothing better.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Combine reverse-geocoding fields into a display name.
///
/// Prefers `"<locality>, <city>"` when both are present and distinct,
/// otherwise whichever one exists.
pub fn compose_place_name(locality: Option<&str>, city: Option<&str>) -> Option<String> {
    let locality = locality.filter(|s| !s.is_empty());
    let city = city.filter(|s| !s.is_empty());

    match (locality, city) {
        (Some(l), Some(c)) if l != c => Some(format!("{}, {}", l, c)),
        (Some(l), _) => Some(l.to_string()),
        (None, Some(c)) => Some(c.to_string()),
        (None, None) => None,
    }
}
