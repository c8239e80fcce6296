use std::time::Duration;

use tracing::warn;

use crate::{GeocodingError, Result};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_QUERY_SUFFIX: &str = "college india";
pub const DEFAULT_COUNTRY_CODES: &str = "in";
pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_LIMIT: usize = 50;

/// Settings for talking to the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// Endpoint root; `/search` is appended
    pub base_url: String,
    /// Appended to every query to bias results toward colleges
    pub query_suffix: String,
    /// Comma separated ISO 3166-1 alpha-2 codes
    pub country_codes: String,
    /// Maximum number of candidates per query
    pub limit: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            query_suffix: DEFAULT_QUERY_SUFFIX.to_owned(),
            country_codes: DEFAULT_COUNTRY_CODES.to_owned(),
            limit: DEFAULT_LIMIT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("messfinder/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl GeocoderConfig {
    pub fn builder() -> GeocoderConfigBuilder {
        GeocoderConfigBuilder::new()
    }

    /// Defaults, overridden by `MESSFINDER_GEOCODER_URL`, `MESSFINDER_GEOCODER_TIMEOUT_SECS`
    /// and `MESSFINDER_GEOCODER_LIMIT` when they are set.
    pub fn from_env() -> Result<Self> {
        let mut builder = GeocoderConfigBuilder::new();

        if let Ok(url) = std::env::var("MESSFINDER_GEOCODER_URL") {
            builder = builder.base_url(url);
        }
        if let Ok(raw) = std::env::var("MESSFINDER_GEOCODER_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                GeocodingError::Config(format!("MESSFINDER_GEOCODER_TIMEOUT_SECS={raw:?}: {e}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Ok(raw) = std::env::var("MESSFINDER_GEOCODER_LIMIT") {
            let limit = raw.trim().parse::<usize>().map_err(|e| {
                GeocodingError::Config(format!("MESSFINDER_GEOCODER_LIMIT={raw:?}: {e}"))
            })?;
            builder = builder.limit(limit);
        }

        builder.try_build()
    }

    /// The free-text query actually sent upstream.
    pub fn decorate_query(&self, query: &str) -> String {
        if self.query_suffix.is_empty() {
            query.to_owned()
        } else {
            format!("{query} {}", self.query_suffix)
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

/// Builder for [`GeocoderConfig`] with chained setters.
#[derive(Debug, Clone, Default)]
pub struct GeocoderConfigBuilder {
    config: GeocoderConfig,
}

impl GeocoderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GeocoderConfig::default(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.query_suffix = suffix.into();
        self
    }

    pub fn country_codes(mut self, codes: impl Into<String>) -> Self {
        self.config.country_codes = codes.into();
        self
    }

    /// Clamped to `1..=50`, the range Nominatim accepts.
    pub fn limit(mut self, limit: usize) -> Self {
        let clamped = limit.clamp(1, MAX_LIMIT);
        if clamped != limit {
            warn!(
                requested = limit,
                used = clamped,
                "Geocoder limit out of range"
            );
        }
        self.config.limit = clamped;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> GeocoderConfig {
        self.config
    }

    /// Like [`build`](Self::build) but rejects settings that cannot produce a working client.
    pub fn try_build(self) -> Result<GeocoderConfig> {
        let config = self.config;
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(GeocodingError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                config.base_url
            )));
        }
        if config.timeout.is_zero() {
            return Err(GeocodingError::Config(
                "timeout must be non-zero".to_owned(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeocoderConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.country_codes, "in");
        assert_eq!(config.limit, 5);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("messfinder/"));
    }

    #[test]
    fn test_decorate_query() {
        let config = GeocoderConfig::default();
        assert_eq!(
            config.decorate_query("Pune University"),
            "Pune University college india"
        );

        let bare = GeocoderConfig::builder().query_suffix("").build();
        assert_eq!(bare.decorate_query("COEP"), "COEP");
    }

    #[test]
    fn test_search_url_trailing_slash() {
        let config = GeocoderConfig::builder()
            .base_url("http://localhost:8080/")
            .build();
        assert_eq!(config.search_url(), "http://localhost:8080/search");
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(GeocoderConfig::builder().limit(0).build().limit, 1);
        assert_eq!(GeocoderConfig::builder().limit(500).build().limit, 50);
        assert_eq!(GeocoderConfig::builder().limit(7).build().limit, 7);
    }

    #[test]
    fn test_try_build_validation() {
        let rejected = GeocoderConfig::builder().base_url("ftp://x").try_build();
        assert!(rejected.is_err());
        assert!(
            GeocoderConfig::builder()
                .timeout(Duration::ZERO)
                .try_build()
                .is_err()
        );
        assert!(GeocoderConfig::builder().try_build().is_ok());
    }
}
