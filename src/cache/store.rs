// Cache store contracts.
// Persistence primitives the local loaders are built on, plus the persisted feed representation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::completion::Completion;
use crate::error::Result;
use crate::feed::FeedItem;

/// Feed item as stored in the cache, kept separate from the domain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedItem {
    pub id: Uuid,
    pub url: Url,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<&FeedItem> for LocalFeedItem {
    fn from(item: &FeedItem) -> Self {
        Self {
            id: item.id(),
            url: item.image_url().clone(),
            description: item.description().map(str::to_owned),
            location: item.location().map(str::to_owned),
        }
    }
}

impl From<LocalFeedItem> for FeedItem {
    fn from(item: LocalFeedItem) -> Self {
        FeedItem::new(item.id, item.url, item.description, item.location)
    }
}

/// The single feed snapshot a store holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedFeed {
    /// Items in the order they were inserted.
    pub items: Vec<LocalFeedItem>,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

pub type DeletionResult = Result<()>;
pub type InsertionResult = Result<()>;
pub type RetrievalResult = Result<Option<CachedFeed>>;

/// Storage for the feed snapshot.
///
/// Every operation reports its outcome exactly once, from whatever context the
/// store runs on.
pub trait FeedStore: Send + Sync {
    /// Remove the snapshot if there is one.
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>);

    /// Replace the snapshot with `items` taken at `timestamp`.
    fn insert(
        &self,
        items: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    );

    /// Read the snapshot, `None` when the store is empty.
    fn retrieve(&self, completion: Completion<RetrievalResult>);
}

impl<S: FeedStore + ?Sized> FeedStore for Arc<S> {
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>) {
        (**self).delete_cached_feed(completion);
    }

    fn insert(
        &self,
        items: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    ) {
        (**self).insert(items, timestamp, completion);
    }

    fn retrieve(&self, completion: Completion<RetrievalResult>) {
        (**self).retrieve(completion);
    }
}

pub type ImageRetrievalResult = Result<Option<Vec<u8>>>;
pub type ImageInsertionResult = Result<()>;

/// Storage for image payloads keyed by their source URL.
pub trait ImageDataStore: Send + Sync {
    /// Read the payload for `url`, `None` when nothing is stored for it.
    fn retrieve_image_data(&self, url: &Url, completion: Completion<ImageRetrievalResult>);

    /// Store `data` for `url`, replacing any previous payload.
    fn insert_image_data(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>);
}

impl<S: ImageDataStore + ?Sized> ImageDataStore for Arc<S> {
    fn retrieve_image_data(&self, url: &Url, completion: Completion<ImageRetrievalResult>) {
        (**self).retrieve_image_data(url, completion);
    }

    fn insert_image_data(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>) {
        (**self).insert_image_data(data, url, completion);
    }
}
