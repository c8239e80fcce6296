//! What the map widget is told to draw: a centre, a zoom level and listing markers.

use messfinder_geocoding::{Coordinates, Place};
use serde::Serialize;

use crate::listing::Listing;

/// Geographic centre of India, the view before any place is chosen.
pub const INDIA_CENTER: Coordinates = Coordinates {
    lat: 20.5937,
    lng: 78.9629,
};

pub const DEFAULT_ZOOM: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollegeHub {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

/// Cities with many colleges, offered as quick picks.
pub const COLLEGE_HUBS: [CollegeHub; 5] = [
    hub("Pune", 18.5204, 73.8567),
    hub("Mumbai", 19.0760, 72.8777),
    hub("Delhi", 28.7041, 77.1025),
    hub("Bangalore", 12.9716, 77.5946),
    hub("Chennai", 13.0827, 80.2707),
];

const fn hub(name: &'static str, lat: f64, lng: f64) -> CollegeHub {
    CollegeHub {
        name,
        coordinates: Coordinates { lat, lng },
    }
}

pub fn college_hub(name: &str) -> Option<&'static CollegeHub> {
    COLLEGE_HUBS
        .iter()
        .find(|hub| hub.name.eq_ignore_ascii_case(name.trim()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub coordinates: Coordinates,
}

impl From<&Listing> for MapMarker {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.name.clone(),
            coordinates: listing.coordinates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFocus {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapFocus {
    /// Markers for every listing, centred on the selected place if there is one.
    pub fn new<'a>(
        listings: impl IntoIterator<Item = &'a Listing>,
        selected: Option<&Place>,
        default_center: Coordinates,
        zoom: u8,
    ) -> Self {
        Self {
            center: selected.map_or(default_center, |place| place.coordinates),
            zoom,
            markers: listings.into_iter().map(MapMarker::from).collect(),
        }
    }

    pub fn marker(&self, id: &str) -> Option<&MapMarker> {
        self.markers.iter().find(|m| m.id == id)
    }
}
