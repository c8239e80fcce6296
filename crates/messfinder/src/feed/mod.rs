//! Live listing subscriptions.
//!
//! A [`ListingFeed`] pushes a complete [`ListingSnapshot`] of the listings matching a
//! [`ListingFilter`] every time that set changes. There are no deltas: each snapshot
//! replaces the previous one. The returned [`Subscription`] is the cancellation handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use ahash::AHashMap;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::listing::{Listing, ListingFilter};

/// Callback invoked with every new snapshot.
pub type SnapshotCallback = Box<dyn FnMut(&ListingSnapshot) + Send>;

/// Source of live, filtered listing snapshots.
pub trait ListingFeed {
    /// Deliver the current matching snapshot right away, then again on every change,
    /// until the returned [`Subscription`] is dropped.
    fn subscribe(&self, filter: ListingFilter, callback: SnapshotCallback) -> Subscription;

    /// Subscribe through a `watch` channel that always holds the latest snapshot.
    fn watch(&self, filter: ListingFilter) -> (Subscription, watch::Receiver<ListingSnapshot>) {
        let (tx, rx) = watch::channel(ListingSnapshot::default());
        let subscription = self.subscribe(
            filter,
            Box::new(move |snapshot| {
                // a closed receiver just means nobody is looking any more
                let _ = tx.send(snapshot.clone());
            }),
        );
        (subscription, rx)
    }
}

/// Handle for a live subscription. Dropping it stops delivery.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// An immutable, cheaply clonable view of the matching listings.
///
/// Listings keep the feed's order (newest first for [`InMemoryListingFeed`]); that order
/// is the tie-break when listings are later ranked by distance.
#[derive(Debug, Clone, Default)]
pub struct ListingSnapshot {
    listings: Arc<[Listing]>,
    by_id: Arc<AHashMap<String, usize>>,
}

impl ListingSnapshot {
    pub fn new(listings: Vec<Listing>) -> Self {
        let by_id = listings
            .iter()
            .enumerate()
            .map(|(position, listing)| (listing.id.clone(), position))
            .collect();
        Self {
            listings: listings.into(),
            by_id: Arc::new(by_id),
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.by_id.get(id).map(|&position| &self.listings[position])
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

struct Subscriber {
    id: u64,
    filter: ListingFilter,
    callback: SnapshotCallback,
}

#[derive(Default)]
struct FeedState {
    listings: Vec<Listing>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl FeedState {
    fn snapshot_for(&self, filter: &ListingFilter) -> ListingSnapshot {
        ListingSnapshot::new(filter.apply(&self.listings).into_iter().cloned().collect())
    }

    fn publish(&mut self) {
        let Self {
            listings,
            subscribers,
            ..
        } = self;
        for subscriber in subscribers.iter_mut() {
            let snapshot = ListingSnapshot::new(
                subscriber
                    .filter
                    .apply(listings.iter())
                    .into_iter()
                    .cloned()
                    .collect(),
            );
            (subscriber.callback)(&snapshot);
        }
    }
}

/// In-process [`ListingFeed`] holding listings newest-first.
///
/// Callbacks run synchronously on the thread that changed the feed and must not call
/// back into the same feed.
#[derive(Clone, Default)]
pub struct InMemoryListingFeed {
    state: Arc<Mutex<FeedState>>,
}

impl InMemoryListingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        let feed = Self::new();
        {
            let mut state = feed.lock();
            state.listings.extend(listings);
            sort_newest_first(&mut state.listings);
        }
        feed
    }

    /// Insert or replace a listing by id and notify subscribers.
    #[instrument(name = "Upsert listing", skip_all, fields(id = %listing.id), level = "debug")]
    pub fn upsert(&self, listing: Listing) {
        let mut state = self.lock();
        match state.listings.iter_mut().find(|l| l.id == listing.id) {
            Some(existing) => *existing = listing,
            None => state.listings.push(listing),
        }
        sort_newest_first(&mut state.listings);
        state.publish();
    }

    /// Remove a listing by id. Subscribers are only notified if something was removed.
    pub fn remove(&self, id: &str) -> Option<Listing> {
        let mut state = self.lock();
        let position = state.listings.iter().position(|l| l.id == id)?;
        let removed = state.listings.remove(position);
        debug!(id, "Removed listing");
        state.publish();
        Some(removed)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sort_newest_first(listings: &mut [Listing]) {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

impl ListingFeed for InMemoryListingFeed {
    fn subscribe(&self, filter: ListingFilter, mut callback: SnapshotCallback) -> Subscription {
        let mut state = self.lock();
        callback(&state.snapshot_for(&filter));

        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push(Subscriber {
            id,
            filter,
            callback,
        });
        debug!(
            id,
            subscribers = state.subscribers.len(),
            "Listing subscription added"
        );
        drop(state);

        let weak: Weak<Mutex<FeedState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                state.subscribers.retain(|s| s.id != id);
                debug!(id, "Listing subscription cancelled");
            }
        })
    }
}
