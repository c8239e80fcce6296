//! College lookup and great-circle distance.
//!
//! This crate turns a free-text query such as `"Pune University"` into a short list of
//! candidate [`Place`]s using a Nominatim-compatible geocoding endpoint, and provides the
//! haversine [`distance_km`] function used to rank listings around a chosen place.
//!
//! The HTTP client lives behind the default `http` feature. Without it the crate still
//! exposes the data types, the distance function and the wire-record parsing, which is
//! enough for callers that bring their own transport.
use tracing::warn;

#[cfg(feature = "http")]
pub mod client;
pub mod config;
pub mod distance;
pub mod nominatim;
pub mod place;
pub mod source;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum GeocodingError {
        #[cfg(feature = "http")]
        #[error("Lookup failed: {0}")]
        LookupFailed(#[from] reqwest::Error),
        #[error("Malformed geocoder response: {0}")]
        MalformedResponse(#[from] serde_json::Error),
        #[error("Invalid coordinates: lat={lat}, lng={lng}")]
        InvalidCoordinates { lat: f64, lng: f64 },
        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl GeocodingError {
        /// True when the lookup was abandoned because the request timed out.
        pub fn is_timeout(&self) -> bool {
            match self {
                #[cfg(feature = "http")]
                Self::LookupFailed(e) => e.is_timeout(),
                _ => false,
            }
        }
    }

    pub type Result<T> = std::result::Result<T, GeocodingError>;
}

pub use error::{GeocodingError, Result};

#[cfg(feature = "http")]
pub use client::GeocodingClient;
pub use config::{GeocoderConfig, GeocoderConfigBuilder};
pub use distance::{EARTH_RADIUS_KM, distance_km};
pub use place::{Coordinates, Place};
pub use source::{PlaceSource, StaticPlaceSource};

/// Returns the query with surrounding whitespace removed, or `None` if nothing is left.
///
/// Blank queries never reach the network.
pub fn normalize_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parses a raw geocoder body into places, skipping records that cannot be used.
///
/// A body that is not a JSON array at all is a [`GeocodingError::MalformedResponse`].
/// An empty array yields an empty list.
pub fn places_from_body(body: &[u8]) -> Result<Vec<Place>> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(body)?;
    let total = records.len();

    let places = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match nominatim::SearchRecord::parse(value) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!(position, error = %e, "Skipping malformed geocoder record");
                None
            }
        })
        .collect::<Vec<_>>();

    if places.len() < total {
        warn!(
            kept = places.len(),
            skipped = total - places.len(),
            "Geocoder response contained unusable records"
        );
    }
    Ok(places)
}
