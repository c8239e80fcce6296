use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GeocodingError, Result, distance::distance_km};

/// A latitude/longitude pair in decimal degrees.
///
/// Values built through [`Coordinates::new`] are finite and within
/// `[-90, 90]` x `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if valid {
            Ok(Self { lat, lng })
        } else {
            Err(GeocodingError::InvalidCoordinates { lat, lng })
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km_to(&self, other: &Self) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// A geocoded candidate for a free-text location query.
///
/// Places are created fresh for every search response and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Display label, the text before the first comma of the full address
    pub name: String,
    /// Full formatted address as returned by the geocoder
    pub address: String,
    pub coordinates: Coordinates,
    /// Best-effort city; falls back to town, then state, then empty
    pub city: String,
}

impl Place {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        coordinates: Coordinates,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            coordinates,
            city: city.into(),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.city.is_empty() {
            write!(f, "{} {}", self.name, self.coordinates)
        } else {
            write!(f, "{}, {} {}", self.name, self.city, self.coordinates)
        }
    }
}
