//! Keeping free-text location search responsive.
//!
//! Two pieces: a [`Debouncer`] that lets a burst of keystrokes settle into one lookup,
//! and a [`LocationResolver`] that numbers each lookup so a slow early response can
//! never overwrite a faster later one.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use messfinder_geocoding::{Place, PlaceSource, distance_km};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;

/// Sequence number of one issued lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets and remembers which one is the latest.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

/// Free-text place lookup with last-request-wins sequencing.
#[derive(Debug)]
pub struct LocationResolver<S> {
    source: S,
    sequencer: SearchSequencer,
}

impl<S: PlaceSource> LocationResolver<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            sequencer: SearchSequencer::new(),
        }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Candidate places for `query`; an empty or blank query yields no places and
    /// no network call.
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>> {
        Ok(self.source.search_places(query).await?)
    }

    /// Like [`search_places`](Self::search_places), but returns `Ok(None)` when a newer
    /// search was started while this one was in flight. Errors from superseded
    /// searches are dropped as well.
    #[instrument(name = "Sequenced place search", skip(self), level = "debug")]
    pub async fn search_latest(&self, query: &str) -> Result<Option<Vec<Place>>> {
        let ticket = self.sequencer.issue();
        let t_search = Instant::now();
        let result = self.source.search_places(query).await;

        if !self.sequencer.is_current(ticket) {
            warn!(
                ticket = ticket.sequence(),
                elapsed = ?t_search.elapsed(),
                "Discarding superseded place search"
            );
            return Ok(None);
        }

        let places = result?;
        info!(
            ticket = ticket.sequence(),
            results = places.len(),
            elapsed = ?t_search.elapsed(),
            "Place search accepted"
        );
        Ok(Some(places))
    }

    /// Great-circle distance in kilometres, see [`distance_km`].
    pub fn distance_km(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> f64 {
        distance_km(lat_a, lng_a, lat_b, lng_b)
    }
}

/// Timer-reset gate: only the last call within a quiet period goes through.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: AtomicU64::new(0),
        }
    }

    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Waits out the quiet period and reports whether this call is still the most
    /// recent one. Callers proceed with the lookup only on `true`.
    pub async fn settle(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tokio::time::sleep(self.quiet).await;
        let settled = self.generation.load(Ordering::Acquire) == generation;
        if !settled {
            debug!(generation, "Input still changing, skipping lookup");
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use messfinder_geocoding::{Coordinates, StaticPlaceSource};
    use tokio::sync::Notify;

    use super::*;

    fn place(name: &str) -> Place {
        Place::new(name, name, Coordinates::new(18.5, 73.8).unwrap(), "Pune")
    }

    #[test]
    fn test_sequencer_tracks_latest() {
        let sequencer = SearchSequencer::new();
        let first = sequencer.issue();
        assert!(sequencer.is_current(first));

        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn test_resolver_distance_delegates() {
        type Resolver = LocationResolver<StaticPlaceSource>;
        let d = Resolver::distance_km(18.5204, 73.8567, 19.0760, 72.8777);
        assert!((119.0..=123.0).contains(&d));
    }

    #[tokio::test]
    async fn test_search_places_blank_query() {
        let resolver = LocationResolver::new(StaticPlaceSource::new().with("", vec![place("x")]));
        assert!(resolver.search_places("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_search_is_accepted() {
        let source = StaticPlaceSource::new().with("coep", vec![place("COEP")]);
        let resolver = LocationResolver::new(source);
        let places = resolver.search_latest("COEP").await.unwrap();
        assert_eq!(places.map(|p| p.len()), Some(1));
    }

    /// Source whose first lookup blocks until released, to force out-of-order completion.
    struct GatedSource {
        gate: Notify,
        calls: Mutex<u32>,
    }

    impl PlaceSource for GatedSource {
        async fn search_places(&self, query: &str) -> messfinder_geocoding::Result<Vec<Place>> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call == 1 {
                self.gate.notified().await;
            }
            Ok(vec![place(query)])
        }
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let resolver = LocationResolver::new(GatedSource {
            gate: Notify::new(),
            calls: Mutex::new(0),
        });

        let slow = resolver.search_latest("Pune");
        let fast = async {
            tokio::task::yield_now().await;
            let result = resolver.search_latest("Pune University").await;
            resolver.source().gate.notify_one();
            result
        };

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow.unwrap(), None);
        let fast = fast.unwrap().expect("latest search should be accepted");
        assert_eq!(fast[0].name, "Pune University");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_only_lets_last_keystroke_through() {
        let debouncer = Debouncer::new(Duration::from_millis(500));

        let first = debouncer.settle();
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            debouncer.settle().await
        };
        let third = async {
            tokio::time::sleep(Duration::from_millis(700)).await;
            debouncer.settle().await
        };

        let (first, second, third) = tokio::join!(first, second, third);
        assert!(!first, "superseded by the keystroke at 100ms");
        assert!(second, "quiet from 100ms to 600ms");
        assert!(third);
    }
}
