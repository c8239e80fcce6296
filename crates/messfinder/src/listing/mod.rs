//! Mess listings as stored by the document store.
//!
//! The core only reads listings: coordinates for ranking, rooms and amenities for
//! filtering. Field names follow the stored JSON (camelCase, coordinates under `location`).

use std::fmt;

use chrono::{DateTime, Utc};
use messfinder_geocoding::Coordinates;
use serde::{Deserialize, Serialize};

mod filter;
pub use filter::{ListingFilter, ListingFilterBuilder, PriceRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Triple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodType {
    Veg,
    NonVeg,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub count: u32,
    /// Monthly rent in rupees
    pub rent: u32,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    #[serde(default)]
    pub wifi: bool,
    #[serde(default)]
    pub food: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<FoodType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals_per_day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    #[serde(rename = "location")]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub amenities: Amenities,
    /// Average review score, absent until the first review
    #[serde(rename = "ratings", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Rent of the cheapest room, `None` for a listing without rooms.
    pub fn cheapest_rent(&self) -> Option<u32> {
        self.rooms.iter().map(|room| room.rent).min()
    }

    pub fn has_room_type(&self, room_type: RoomType) -> bool {
        self.rooms.iter().any(|room| room.room_type == room_type)
    }

    /// Parse listings from a JSON array of stored documents.
    pub fn from_json_array(json: &str) -> crate::error::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn listing(id: &str, name: &str, lat: f64, lng: f64) -> Listing {
        Listing {
            id: id.to_owned(),
            name: name.to_owned(),
            owner_id: "owner".to_owned(),
            description: String::new(),
            address: format!("{name}, India"),
            coordinates: Coordinates::new(lat, lng).unwrap(),
            photos: Vec::new(),
            rooms: vec![Room {
                room_type: RoomType::Double,
                count: 4,
                rent: 6000,
                photos: Vec::new(),
            }],
            amenities: Amenities::default(),
            rating: None,
            created_at: DateTime::<Utc>::default(),
        }
    }

    pub(crate) fn room(room_type: RoomType, rent: u32) -> Room {
        Room {
            room_type,
            count: 1,
            rent,
            photos: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{listing, room};

    #[test]
    fn test_cheapest_rent() {
        let mut mess = listing("1", "Sunshine Mess", 18.5204, 73.8567);
        mess.rooms = vec![room(RoomType::Single, 8000), room(RoomType::Double, 6000)];
        assert_eq!(mess.cheapest_rent(), Some(6000));

        mess.rooms.clear();
        assert_eq!(mess.cheapest_rent(), None);
    }

    #[test]
    fn test_parse_stored_document() {
        let json = r#"[{
            "id": "1",
            "name": "Sunshine Mess",
            "ownerId": "owner1",
            "description": "Homely food",
            "address": "Near Engineering College, Pune",
            "location": {"lat": 18.5204, "lng": 73.8567},
            "photos": [],
            "rooms": [
                {"type": "single", "count": 5, "rent": 8000, "photos": []},
                {"type": "double", "count": 8, "rent": 6000, "photos": []}
            ],
            "amenities": {"wifi": true, "food": true, "foodType": "non-veg", "mealsPerDay": 3},
            "ratings": 4.5,
            "createdAt": "2024-03-01T10:00:00Z"
        }]"#;

        let listings = Listing::from_json_array(json).unwrap();
        assert_eq!(listings.len(), 1);
        let mess = &listings[0];
        assert_eq!(mess.owner_id, "owner1");
        assert_eq!(mess.coordinates.lat, 18.5204);
        assert_eq!(mess.amenities.food_type, Some(FoodType::NonVeg));
        assert_eq!(mess.amenities.meals_per_day, Some(3));
        assert_eq!(mess.rating, Some(4.5));
        assert!(mess.has_room_type(RoomType::Single));
        assert!(!mess.has_room_type(RoomType::Triple));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Listing::from_json_array("{not json").is_err());
    }
}
