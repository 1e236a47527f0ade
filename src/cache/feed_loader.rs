// Local feed loader.
// Serves the cached feed while fresh, replaces it on save, and evicts it when stale or unreadable.

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::feed::{FeedCache, FeedItem, FeedLoader};

use super::policy;
use super::store::{DeletionResult, FeedStore, LocalFeedItem};

/// Source of the current time used for timestamps and freshness checks.
pub type CurrentDate = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Feed loader and cache backed by a [`FeedStore`].
///
/// Callbacks handed to the store only hold a weak reference to the loader. Once
/// the loader is dropped, store operations still finish but their results are
/// never delivered.
pub struct LocalFeedLoader<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    store: S,
    current_date: CurrentDate,
}

impl<S: FeedStore + 'static> LocalFeedLoader<S> {
    pub fn new(store: S, current_date: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                current_date: Box::new(current_date),
            }),
        }
    }

    /// Create a loader that reads the system clock.
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, Utc::now)
    }

    /// Delete the cached feed if it cannot be read or is no longer fresh.
    pub fn validate_cache(&self, completion: Completion<Result<()>>) {
        let loader = Arc::downgrade(&self.inner);

        self.inner.store.retrieve(Box::new(move |retrieval| {
            let Some(loader) = loader.upgrade() else {
                return;
            };

            match retrieval {
                Err(error) => {
                    debug!(%error, "cached feed unreadable, deleting");
                    loader.delete(completion);
                }
                Ok(Some(cache)) if !policy::is_valid(cache.timestamp, loader.now()) => {
                    debug!(cached_at = %cache.timestamp, "cached feed is stale, deleting");
                    loader.delete(completion);
                }
                Ok(_) => completion(Ok(())),
            }
        }));
    }
}

impl<S: FeedStore + 'static> Inner<S> {
    fn now(&self) -> DateTime<Utc> {
        (self.current_date)()
    }

    /// Insert `items` at the current time; called once the old snapshot is gone.
    fn cache(self: &Arc<Self>, items: Vec<FeedItem>, completion: Completion<Result<()>>) {
        let loader = Arc::downgrade(self);
        let local = items.iter().map(LocalFeedItem::from).collect();

        self.store.insert(
            local,
            self.now(),
            Box::new(move |insertion| {
                if loader.upgrade().is_none() {
                    return;
                }
                completion(insertion);
            }),
        );
    }

    fn delete(self: &Arc<Self>, completion: Completion<DeletionResult>) {
        let loader: Weak<Self> = Arc::downgrade(self);

        self.store.delete_cached_feed(Box::new(move |deletion| {
            if loader.upgrade().is_none() {
                return;
            }
            completion(deletion);
        }));
    }
}

impl<S: FeedStore + 'static> FeedLoader for LocalFeedLoader<S> {
    type Error = Error;

    /// Deliver the cached items while fresh, otherwise an empty feed.
    /// Never modifies the store.
    fn load(&self, completion: Completion<Result<Vec<FeedItem>>>) {
        let loader = Arc::downgrade(&self.inner);

        self.inner.store.retrieve(Box::new(move |retrieval| {
            let Some(loader) = loader.upgrade() else {
                return;
            };

            let result = retrieval.map(|cache| match cache {
                Some(cache) if policy::is_valid(cache.timestamp, loader.now()) => {
                    cache.items.into_iter().map(FeedItem::from).collect()
                }
                Some(cache) => {
                    debug!(cached_at = %cache.timestamp, "cached feed is stale, delivering empty feed");
                    Vec::new()
                }
                None => Vec::new(),
            });

            completion(result);
        }));
    }
}

impl<S: FeedStore + 'static> FeedCache for LocalFeedLoader<S> {
    type Error = Error;

    /// Delete the current snapshot, then insert `items` stamped with the current time.
    ///
    /// If the insert fails after a successful delete the store is left empty and
    /// the insert error is delivered.
    fn save(&self, items: Vec<FeedItem>, completion: Completion<Result<()>>) {
        let loader = Arc::downgrade(&self.inner);

        self.inner.store.delete_cached_feed(Box::new(move |deletion| {
            let Some(loader) = loader.upgrade() else {
                return;
            };

            match deletion {
                Ok(()) => loader.cache(items, completion),
                Err(error) => completion(Err(error)),
            }
        }));
    }
}
