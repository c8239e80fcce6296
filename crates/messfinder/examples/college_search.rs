//! College search and proximity ranking
//!
//! This example demonstrates the search page flow against the public Nominatim service:
//! - Looking up a college by name
//! - Loading listings into a live feed
//! - Ranking the listings around the chosen college
//!
//! Run with `cargo run --example college_search -- "Pune University"`.

use messfinder::{
    InMemoryListingFeed, Listing, ListingFeed, ListingFilter, ProximitySearch, SearchConfig,
    SortOrder,
};
use tracing::Level;

const LISTINGS: &str = r#"[
    {"id": "1", "name": "Sunshine Mess", "address": "Near Engineering College, Pune",
     "location": {"lat": 18.5204, "lng": 73.8567},
     "rooms": [{"type": "single", "count": 5, "rent": 8000}, {"type": "double", "count": 8, "rent": 6000}],
     "amenities": {"wifi": true, "food": true, "foodType": "both"}, "ratings": 4.5},
    {"id": "2", "name": "Student Haven", "address": "College Road, Mumbai",
     "location": {"lat": 19.0760, "lng": 72.8777},
     "rooms": [{"type": "triple", "count": 4, "rent": 4500}],
     "amenities": {"wifi": false, "food": true, "foodType": "veg"}},
    {"id": "3", "name": "Royal Mess", "address": "North Campus, Delhi",
     "location": {"lat": 28.7041, "lng": 77.1025},
     "rooms": [{"type": "single", "count": 10, "rent": 12000}],
     "amenities": {"wifi": true, "food": true, "foodType": "non-veg"}, "ratings": 4.8}
]"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    messfinder::init_logging(Level::INFO)?;

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Pune University".to_owned());

    let feed = InMemoryListingFeed::with_listings(Listing::from_json_array(LISTINGS)?);
    let filter = ListingFilter::builder().price_range(0, 15_000).build();
    let (_subscription, snapshots) = feed.watch(filter);

    let mut search = ProximitySearch::with_geocoder(SearchConfig::default())?;
    search.apply_snapshot(snapshots.borrow().clone());

    println!("Suggestions for '{query}':");
    let suggestions = search.suggest(&query).await?.unwrap_or_default();
    for (i, place) in suggestions.iter().enumerate() {
        println!("  {}. {place}", i + 1);
    }

    let Some(college) = suggestions.into_iter().next() else {
        println!("No colleges found, listings by rating instead:");
        for listing in search.sorted(SortOrder::Rating) {
            println!("  {listing}");
        }
        return Ok(());
    };

    println!("\nMesses near {}:", college.name);
    for ranked in search.select(college) {
        println!("  {ranked}");
    }

    Ok(())
}
