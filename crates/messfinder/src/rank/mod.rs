//! Proximity ranking and the other listing sort orders.
//!
//! Ranking never touches the listings themselves: each call produces fresh
//! [`RankedListing`] views that borrow the listing and carry the derived distance.

use std::{cmp::Ordering, fmt};

use itertools::Itertools;
use messfinder_geocoding::{Coordinates, Place};
use tracing::{debug, instrument};

use crate::listing::Listing;

/// A listing paired with its distance from the chosen origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedListing<'a> {
    pub listing: &'a Listing,
    pub distance_km: f64,
}

impl fmt::Display for RankedListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {:.1} km", self.listing.name, self.distance_km)
    }
}

/// Rank listings by great-circle distance from `origin`, nearest first.
///
/// The sort is stable, so listings at equal distance keep their input order. Nothing is
/// truncated.
#[instrument(name = "Rank listings", skip_all, fields(origin = %origin.name), level = "debug")]
pub fn rank<'a>(
    origin: &Place,
    listings: impl IntoIterator<Item = &'a Listing>,
) -> Vec<RankedListing<'a>> {
    rank_from(&origin.coordinates, listings)
}

/// [`rank`] for a bare coordinate origin.
pub fn rank_from<'a>(
    origin: &Coordinates,
    listings: impl IntoIterator<Item = &'a Listing>,
) -> Vec<RankedListing<'a>> {
    let ranked = listings
        .into_iter()
        .map(|listing| RankedListing {
            listing,
            distance_km: origin.distance_km_to(&listing.coordinates),
        })
        .sorted_by(by_distance)
        .collect::<Vec<_>>();

    debug!(
        count = ranked.len(),
        nearest_km = ranked.first().map(|r| r.distance_km),
        "Ranked listings by distance"
    );
    ranked
}

/// Sort key with millimetre resolution, so rounding noise between geographically equal
/// distances does not reorder listings.
fn distance_key(distance_km: f64) -> f64 {
    (distance_km * 1e6).round()
}

fn by_distance(a: &RankedListing<'_>, b: &RankedListing<'_>) -> Ordering {
    let (a, b) = (distance_key(a.distance_km), distance_key(b.distance_km));
    a.total_cmp(&b)
}

/// The leading part of an already ranked list that lies within `max_km`.
pub fn within_radius<'r, 'a>(
    ranked: &'r [RankedListing<'a>],
    max_km: f64,
) -> &'r [RankedListing<'a>] {
    let limit = distance_key(max_km);
    let inside = |r: &RankedListing<'_>| distance_key(r.distance_km) <= limit;
    &ranked[..ranked.partition_point(inside)]
}

/// Orders offered by the results page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortOrder {
    /// The feed's own order
    #[default]
    Recommended,
    /// Nearest to the given point first
    Distance(Coordinates),
    /// Cheapest room first; listings without rooms last
    PriceLowToHigh,
    /// Most expensive cheapest-room first; listings without rooms last
    PriceHighToLow,
    /// Best rated first; unrated last
    Rating,
}

/// Sort listings for display. Every order is stable.
pub fn sort_listings<'a>(
    listings: impl IntoIterator<Item = &'a Listing>,
    order: SortOrder,
) -> Vec<&'a Listing> {
    let listings = listings.into_iter();
    match order {
        SortOrder::Recommended => listings.collect(),
        SortOrder::Distance(origin) => rank_from(&origin, listings)
            .into_iter()
            .map(|r| r.listing)
            .collect(),
        SortOrder::PriceLowToHigh => listings
            .sorted_by(|a, b| by_rent(a, b, u32::cmp))
            .collect(),
        SortOrder::PriceHighToLow => listings
            .sorted_by(|a, b| by_rent(a, b, |x, y| y.cmp(x)))
            .collect(),
        SortOrder::Rating => listings
            .sorted_by(|a, b| by_rating(a, b))
            .collect(),
    }
}

fn by_rent(a: &Listing, b: &Listing, cmp: impl Fn(&u32, &u32) -> Ordering) -> Ordering {
    missing_last(a.cheapest_rent(), b.cheapest_rent(), cmp)
}

fn by_rating(a: &Listing, b: &Listing) -> Ordering {
    missing_last(a.rating, b.rating, |x, y| y.total_cmp(x))
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
