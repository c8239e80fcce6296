use std::time::Duration;

use messfinder_geocoding::{Coordinates, GeocoderConfig};

use crate::{
    error::{MessFinderError, Result},
    listing::PriceRange,
    map::{DEFAULT_ZOOM, INDIA_CENTER},
};

/// Settings for the search page core.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Quiet period before a typed query is looked up
    pub debounce: Duration,
    pub geocoder: GeocoderConfig,
    /// Price slider bounds before the user touches it
    pub default_price_range: PriceRange,
    pub map_center: Coordinates,
    pub map_zoom: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            geocoder: GeocoderConfig::default(),
            default_price_range: (0, 15_000),
            map_center: INDIA_CENTER,
            map_zoom: DEFAULT_ZOOM,
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }
}

/// Builder for creating search configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Snappier suggestions: shorter debounce and a tighter geocoder timeout
    pub fn responsive() -> Self {
        let mut builder = Self::new();
        builder.config.debounce = Duration::from_millis(250);
        builder.config.geocoder.timeout = Duration::from_secs(5);
        builder
    }

    /// Fewer upstream calls for rate-limited or metered geocoders
    pub fn conservative() -> Self {
        let mut builder = Self::new();
        builder.config.debounce = Duration::from_millis(800);
        builder.config.geocoder.limit = 3;
        builder
    }

    pub fn debounce(mut self, quiet: Duration) -> Self {
        self.config.debounce = quiet;
        self
    }

    pub fn geocoder(mut self, geocoder: GeocoderConfig) -> Self {
        self.config.geocoder = geocoder;
        self
    }

    /// Bounds are swapped if given in the wrong order.
    pub fn default_price_range(mut self, min: u32, max: u32) -> Self {
        self.config.default_price_range = (min.min(max), min.max(max));
        self
    }

    pub fn map_center(mut self, center: Coordinates) -> Self {
        self.config.map_center = center;
        self
    }

    /// Zoom levels follow web map tiles, 1 (world) to 20 (building)
    pub fn map_zoom(mut self, zoom: u8) -> Result<Self> {
        if !(1..=20).contains(&zoom) {
            return Err(MessFinderError::ConfigError(format!(
                "Map zoom must be between 1 and 20, got {zoom}"
            )));
        }
        self.config.map_zoom = zoom;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let config = SearchConfigBuilder::new().build();
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.default_price_range, (0, 15_000));
        assert_eq!(config.map_zoom, 12);
        assert_eq!(config.geocoder.limit, 5);
    }

    #[test]
    fn test_presets() {
        let responsive = SearchConfigBuilder::responsive().build();
        assert_eq!(responsive.debounce, Duration::from_millis(250));
        assert_eq!(responsive.geocoder.timeout, Duration::from_secs(5));

        let conservative = SearchConfigBuilder::conservative().build();
        assert_eq!(conservative.debounce, Duration::from_millis(800));
        assert_eq!(conservative.geocoder.limit, 3);
    }

    #[test]
    fn test_override_presets() {
        let config = SearchConfigBuilder::conservative()
            .debounce(Duration::from_millis(300))
            .default_price_range(9000, 2000)
            .build();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.geocoder.limit, 3);
        assert_eq!(config.default_price_range, (2000, 9000));
    }

    #[test]
    fn test_map_zoom_validation() {
        assert!(SearchConfigBuilder::new().map_zoom(0).is_err());
        assert!(SearchConfigBuilder::new().map_zoom(21).is_err());
        let config = SearchConfigBuilder::new().map_zoom(15).unwrap().build();
        assert_eq!(config.map_zoom, 15);
    }

    #[test]
    fn test_custom_geocoder() {
        let geocoder = GeocoderConfig::builder()
            .base_url("http://localhost:9000")
            .build();
        let config = SearchConfig::builder().geocoder(geocoder).build();
        assert_eq!(config.geocoder.search_url(), "http://localhost:9000/search");
    }
}
