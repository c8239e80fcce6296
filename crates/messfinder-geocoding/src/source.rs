use std::future::Future;

use crate::{Place, Result};

/// Anything that can turn a free-text query into candidate places.
///
/// Implemented by [`GeocodingClient`](crate::GeocodingClient); test doubles and
/// alternative providers implement it too.
pub trait PlaceSource {
    fn search_places(&self, query: &str) -> impl Future<Output = Result<Vec<Place>>> + Send;
}

/// Fixed answers keyed by query, handy for tests and offline demos.
///
/// Unknown queries resolve to an empty list.
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceSource {
    entries: Vec<(String, Vec<Place>)>,
}

impl StaticPlaceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: impl Into<String>, places: Vec<Place>) -> Self {
        self.entries.push((query.into(), places));
        self
    }
}

impl PlaceSource for StaticPlaceSource {
    async fn search_places(&self, query: &str) -> Result<Vec<Place>> {
        let Some(query) = crate::normalize_query(query) else {
            return Ok(Vec::new());
        };
        Ok(self
            .entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(query))
            .map(|(_, places)| places.clone())
            .unwrap_or_default())
    }
}
