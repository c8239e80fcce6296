//! Messfinder - College Search and Proximity Ranking for Mess Listings
//!
//! Messfinder is the search core behind a student accommodation marketplace. A student
//! types the name of their college, picks one of the geocoded suggestions, and sees
//! nearby messes (boarding houses) ranked by great-circle distance. The listings come from
//! a live, already-filtered feed; ranking is done locally and never modifies them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use messfinder::{ProximitySearch, SearchConfig, ListingSnapshot};
//!
//! # async fn run(listings: Vec<messfinder::Listing>) -> Result<(), messfinder::error::MessFinderError> {
//! let mut search = ProximitySearch::with_geocoder(SearchConfig::default())?;
//! search.apply_snapshot(ListingSnapshot::new(listings));
//!
//! if let Some(suggestions) = search.suggest("Pune University").await? {
//!     if let Some(college) = suggestions.into_iter().next() {
//!         for ranked in search.select(college) {
//!             println!("{} is {:.1} km away", ranked.listing.name, ranked.distance_km);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **College lookup**: Nominatim search biased toward colleges in India, capped at five
//!   candidates, tolerant of malformed records
//! - **Proximity ranking**: haversine distance with a stable nearest-first sort
//! - **Stale response protection**: each lookup is sequenced; only the latest one is accepted
//! - **Live listings**: subscribe to filtered, full-snapshot listing feeds
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, util::SubscriberInitExt};

mod config;
mod core;
pub mod error;
mod feed;
mod listing;
mod map;
mod rank;
mod session;

pub use crate::core::ProximitySearch;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use feed::{
    InMemoryListingFeed, ListingFeed, ListingSnapshot, SnapshotCallback, Subscription,
};
pub use listing::{
    Amenities, FoodType, Listing, ListingFilter, ListingFilterBuilder, PriceRange, Room, RoomType,
};
pub use map::{
    COLLEGE_HUBS, CollegeHub, DEFAULT_ZOOM, INDIA_CENTER, MapFocus, MapMarker, college_hub,
};
pub use messfinder_geocoding as geocoding;
pub use messfinder_geocoding::{Coordinates, Place, PlaceSource, distance_km};
pub use rank::{RankedListing, SortOrder, rank, rank_from, sort_listings, within_radius};
pub use session::{Debouncer, LocationResolver, SearchSequencer, SearchTicket};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Messfinder library.
///
/// Sets up a `tracing` fmt subscriber filtered by `RUST_LOG` when present, or by
/// `level` otherwise. Only the first call installs anything; later calls are no-ops.
///
/// # Examples
///
/// ```rust
/// use messfinder::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), messfinder::error::MessFinderError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::MessFinderError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .finish()
            .try_init()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        setup_test_env();
        assert!(init_logging(tracing::Level::DEBUG).is_ok());
    }

    #[test]
    fn test_hub_distances() {
        setup_test_env();

        let pune = college_hub("Pune").unwrap().coordinates;
        let mumbai = college_hub("Mumbai").unwrap().coordinates;
        let d = pune.distance_km_to(&mumbai);
        assert!((119.0..=123.0).contains(&d), "Pune-Mumbai was {d} km");
    }
}
