use std::time::Instant;

use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::{
    GeocoderConfig, GeocodingError, Place, Result, normalize_query, places_from_body,
    source::PlaceSource,
};

/// HTTP client for a Nominatim-compatible `/search` endpoint.
///
/// Every call is a fresh round trip; nothing is cached. Overlapping calls are not
/// cancelled here, callers that need "last request wins" should sequence them.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    config: GeocoderConfig,
}

impl GeocodingClient {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                GeocodingError::Config(format!("building HTTP client: {e}"))
            })?;
        Ok(Self { http, config })
    }

    /// Reuse an existing `reqwest` client. Its own timeout settings apply.
    pub fn with_http_client(http: Client, config: GeocoderConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Look up candidate places for a free-text query.
    ///
    /// Blank queries return an empty list without touching the network. At most
    /// `config.limit` places are returned, whatever the upstream sends. Transport
    /// errors, timeouts and non-success statuses are [`GeocodingError::LookupFailed`].
    #[instrument(name = "Geocode query", skip(self), level = "info")]
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>> {
        let Some(query) = normalize_query(query) else {
            debug!("Blank query, skipping lookup");
            return Ok(Vec::new());
        };

        let t_request = Instant::now();
        let decorated = self.config.decorate_query(query);
        let limit = self.config.limit.to_string();

        let response = self
            .http
            .get(self.config.search_url())
            .query(&[
                ("q", decorated.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
                ("countrycodes", self.config.country_codes.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let mut places = places_from_body(&body)?;
        if places.len() > self.config.limit {
            debug!(
                returned = places.len(),
                limit = self.config.limit,
                "Upstream ignored the result limit, truncating"
            );
            places.truncate(self.config.limit);
        }

        info!(
            results = places.len(),
            elapsed = ?t_request.elapsed(),
            "Geocode lookup complete"
        );
        Ok(places)
    }
}

impl PlaceSource for GeocodingClient {
    async fn search_places(&self, query: &str) -> Result<Vec<Place>> {
        Self::search_places(self, query).await
    }
}
