//! Wire records returned by a Nominatim `/search` call with `addressdetails=1`.
//!
//! Only the fields needed to build a [`Place`] are modelled; everything else in the
//! record is ignored.
use serde::Deserialize;

use crate::{Place, Result, place::Coordinates};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRecord {
    pub display_name: String,
    /// Nominatim encodes coordinates as strings
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub address: Option<AddressDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressDetails {
    pub city: Option<String>,
    pub town: Option<String>,
    pub state: Option<String>,
}

impl AddressDetails {
    /// City, else town, else state, else empty. Blank fields count as missing.
    pub fn best_city(&self) -> &str {
        [&self.city, &self.town, &self.state]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or_default()
    }
}

/// Label shown for a place: the text before the first comma of the display name.
pub fn short_name(display_name: &str) -> &str {
    display_name
        .split(',')
        .next()
        .unwrap_or(display_name)
        .trim()
}

impl SearchRecord {
    /// Decodes one record of the response array into a [`Place`].
    pub fn parse(value: serde_json::Value) -> Result<Place> {
        let record: Self = serde_json::from_value(value)?;
        record.into_place()
    }

    pub fn into_place(self) -> Result<Place> {
        let coordinates = Coordinates::new(parse_degrees(&self.lat)?, parse_degrees(&self.lon)?)?;
        let city = self
            .address
            .as_ref()
            .map(AddressDetails::best_city)
            .unwrap_or_default()
            .to_owned();

        Ok(Place {
            name: short_name(&self.display_name).to_owned(),
            address: self.display_name,
            coordinates,
            city,
        })
    }
}

fn parse_degrees(raw: &str) -> Result<f64> {
    // reuse serde_json's number parsing so a bad value surfaces as MalformedResponse
    Ok(serde_json::from_str::<f64>(raw.trim())?)
}
