// In-memory cache store.
// Holds the feed snapshot and image payloads in process memory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use url::Url;

use crate::completion::Completion;

use super::store::{
    CachedFeed, DeletionResult, FeedStore, ImageDataStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedItem, RetrievalResult,
};

/// Store that completes every operation synchronously on the calling thread.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    feed: Option<CachedFeed>,
    images: HashMap<Url, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FeedStore for InMemoryStore {
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>) {
        self.state().feed = None;
        completion(Ok(()));
    }

    fn insert(
        &self,
        items: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    ) {
        self.state().feed = Some(CachedFeed { items, timestamp });
        completion(Ok(()));
    }

    fn retrieve(&self, completion: Completion<RetrievalResult>) {
        let feed = self.state().feed.clone();
        completion(Ok(feed));
    }
}

impl ImageDataStore for InMemoryStore {
    fn retrieve_image_data(&self, url: &Url, completion: Completion<ImageRetrievalResult>) {
        let data = self.state().images.get(url).cloned();
        completion(Ok(data));
    }

    fn insert_image_data(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>) {
        self.state().images.insert(url.clone(), data);
        completion(Ok(()));
    }
}
