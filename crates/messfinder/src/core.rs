//! The search page core.
//!
//! [`ProximitySearch`] glues together place lookup, the live listing snapshot and
//! proximity ranking:
//!
//! 1. the user types, the presentation layer debounces and calls [`ProximitySearch::suggest`]
//! 2. the user picks a suggestion with [`ProximitySearch::select`], which returns the
//!    listings ranked by distance from it
//! 3. every new snapshot from the listing feed is handed to
//!    [`ProximitySearch::apply_snapshot`], after which [`ProximitySearch::ranked`] reflects it
//!
//! ```rust
//! use messfinder::{
//!     InMemoryListingFeed, ListingFeed, ListingFilter, ProximitySearch, SearchConfig,
//!     geocoding::StaticPlaceSource,
//! };
//!
//! let feed = InMemoryListingFeed::new();
//! let (_subscription, snapshots) = feed.watch(ListingFilter::default());
//!
//! let mut search = ProximitySearch::new(StaticPlaceSource::new(), SearchConfig::default());
//! search.apply_snapshot(snapshots.borrow().clone());
//! assert!(search.ranked().is_none());
//! ```

use messfinder_geocoding::{Place, PlaceSource};
use tracing::{info, instrument};

use crate::{
    config::SearchConfig,
    error::Result,
    feed::ListingSnapshot,
    listing::Listing,
    map::MapFocus,
    rank::{RankedListing, SortOrder, rank, sort_listings},
    session::{Debouncer, LocationResolver},
};

/// State behind the search page: the latest snapshot and the selected place.
///
/// The selected place is replaced on every selection, never modified. Ranked results are
/// computed on demand from the current snapshot, so they are never stale.
#[derive(Debug)]
pub struct ProximitySearch<S> {
    resolver: LocationResolver<S>,
    debouncer: Debouncer,
    config: SearchConfig,
    snapshot: ListingSnapshot,
    selected: Option<Place>,
}

#[cfg(feature = "http")]
impl ProximitySearch<messfinder_geocoding::GeocodingClient> {
    /// Search backed by the HTTP geocoder described in `config.geocoder`.
    pub fn with_geocoder(config: SearchConfig) -> Result<Self> {
        let client = messfinder_geocoding::GeocodingClient::new(config.geocoder.clone())?;
        Ok(Self::new(client, config))
    }
}

impl<S: PlaceSource> ProximitySearch<S> {
    pub fn new(source: S, config: SearchConfig) -> Self {
        Self {
            resolver: LocationResolver::new(source),
            debouncer: Debouncer::new(config.debounce),
            config,
            snapshot: ListingSnapshot::default(),
            selected: None,
        }
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub const fn resolver(&self) -> &LocationResolver<S> {
        &self.resolver
    }

    /// Suggestions for `query`, or `Ok(None)` if a newer query made this one stale.
    ///
    /// Lookup failures are returned as errors; the rest of the page keeps working on
    /// the last snapshot and selection.
    pub async fn suggest(&self, query: &str) -> Result<Option<Vec<Place>>> {
        self.resolver.search_latest(query).await
    }

    /// [`suggest`](Self::suggest) after the configured quiet period; `Ok(None)` if more
    /// input arrived in the meantime.
    pub async fn suggest_debounced(&self, query: &str) -> Result<Option<Vec<Place>>> {
        if !self.debouncer.settle().await {
            return Ok(None);
        }
        self.suggest(query).await
    }

    /// Make `place` the origin and return the listings ranked around it.
    #[instrument(name = "Select place", skip_all, fields(place = %place.name), level = "info")]
    pub fn select(&mut self, place: Place) -> Vec<RankedListing<'_>> {
        info!(
            center = %place.coordinates,
            listings = self.snapshot.len(),
            "Selected new origin"
        );
        let place = self.selected.insert(place);
        rank(place, self.snapshot.listings())
    }

    pub fn clear_selection(&mut self) -> Option<Place> {
        self.selected.take()
    }

    pub const fn selected(&self) -> Option<&Place> {
        self.selected.as_ref()
    }

    /// Replace the listing snapshot wholesale.
    pub fn apply_snapshot(&mut self, snapshot: ListingSnapshot) {
        self.snapshot = snapshot;
    }

    pub const fn snapshot(&self) -> &ListingSnapshot {
        &self.snapshot
    }

    /// Listings in feed order, unranked.
    pub fn listings(&self) -> &[Listing] {
        self.snapshot.listings()
    }

    /// Listings ranked around the selected place, `None` until a place is selected.
    pub fn ranked(&self) -> Option<Vec<RankedListing<'_>>> {
        self.selected
            .as_ref()
            .map(|place| rank(place, self.snapshot.listings()))
    }

    /// Listings in the requested display order.
    pub fn sorted(&self, order: SortOrder) -> Vec<&Listing> {
        sort_listings(self.snapshot.listings(), order)
    }

    /// Map centre, zoom and markers for the current state.
    pub fn map_focus(&self) -> MapFocus {
        MapFocus::new(
            self.snapshot.listings(),
            self.selected.as_ref(),
            self.config.map_center,
            self.config.map_zoom,
        )
    }
}
