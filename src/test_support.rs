// Test doubles and fixtures shared by the unit tests.
// Spies record what they were asked to do and hold completions until a test resolves them.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;
use uuid::Uuid;

use crate::api::{HttpClient, HttpClientTask, HttpResponse, HttpResult};
use crate::cache::{CachedFeed, FeedStore, ImageDataStore, LocalFeedItem};
use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::feed::FeedItem;

pub fn any_url() -> Url {
    Url::parse("http://any-url.com").unwrap()
}

pub fn any_data() -> Vec<u8> {
    b"any data".to_vec()
}

pub fn any_error() -> Error {
    Error::Other("any error".to_string())
}

pub fn unique_item() -> FeedItem {
    FeedItem::new(
        Uuid::new_v4(),
        any_url(),
        Some("any description".to_string()),
        Some("any location".to_string()),
    )
}

/// Two unique items in domain and persisted form.
pub fn unique_feed() -> (Vec<FeedItem>, Vec<LocalFeedItem>) {
    let items = vec![unique_item(), unique_item()];
    let local = items.iter().map(LocalFeedItem::from).collect();
    (items, local)
}

/// A completion that records every value it receives.
pub fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Completion<T>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let completion: Completion<T> = Box::new(move |value| sink.lock().unwrap().push(value));
    (received, completion)
}

/// Take the completion at `index` out of a queue without holding the lock while it runs.
fn take_completion<T>(queue: &Mutex<Vec<Option<Completion<T>>>>, index: usize) -> Completion<T> {
    queue.lock().unwrap()[index]
        .take()
        .expect("completion already resolved")
}

#[derive(Default)]
pub struct HttpClientSpy {
    messages: Mutex<Vec<(Url, Option<Completion<HttpResult>>)>>,
    cancelled: Arc<Mutex<Vec<Url>>>,
}

impl HttpClientSpy {
    pub fn requested_urls(&self) -> Vec<Url> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn cancelled_urls(&self) -> Vec<Url> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn complete_with_error(&self, index: usize) {
        self.take(index)(Err(any_error()));
    }

    pub fn complete_with_status(&self, status: u16, body: &[u8], index: usize) {
        let status = StatusCode::from_u16(status).unwrap();
        self.take(index)(Ok(HttpResponse::new(status, body)));
    }

    fn take(&self, index: usize) -> Completion<HttpResult> {
        self.messages.lock().unwrap()[index]
            .1
            .take()
            .expect("request already completed")
    }
}

impl HttpClient for HttpClientSpy {
    fn get(&self, url: &Url, completion: Completion<HttpResult>) -> Box<dyn HttpClientTask> {
        self.messages
            .lock()
            .unwrap()
            .push((url.clone(), Some(completion)));

        Box::new(HttpClientSpyTask {
            url: url.clone(),
            cancelled: Arc::clone(&self.cancelled),
        })
    }
}

struct HttpClientSpyTask {
    url: Url,
    cancelled: Arc<Mutex<Vec<Url>>>,
}

impl HttpClientTask for HttpClientSpyTask {
    fn cancel(&self) {
        self.cancelled.lock().unwrap().push(self.url.clone());
    }
}

/// Messages a feed store receives, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStoreMessage {
    DeleteCachedFeed,
    Insert(Vec<LocalFeedItem>, DateTime<Utc>),
    Retrieve,
}

#[derive(Default)]
pub struct FeedStoreSpy {
    messages: Mutex<Vec<FeedStoreMessage>>,
    deletions: Mutex<Vec<Option<Completion<Result<()>>>>>,
    insertions: Mutex<Vec<Option<Completion<Result<()>>>>>,
    retrievals: Mutex<Vec<Option<Completion<Result<Option<CachedFeed>>>>>>,
}

impl FeedStoreSpy {
    pub fn messages(&self) -> Vec<FeedStoreMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn complete_deletion(&self, result: Result<()>, index: usize) {
        take_completion(&self.deletions, index)(result);
    }

    pub fn complete_deletion_successfully(&self) {
        self.complete_deletion(Ok(()), 0);
    }

    pub fn complete_insertion(&self, result: Result<()>, index: usize) {
        take_completion(&self.insertions, index)(result);
    }

    pub fn complete_insertion_successfully(&self) {
        self.complete_insertion(Ok(()), 0);
    }

    pub fn complete_retrieval(&self, result: Result<Option<CachedFeed>>, index: usize) {
        take_completion(&self.retrievals, index)(result);
    }

    pub fn complete_retrieval_with_empty_cache(&self) {
        self.complete_retrieval(Ok(None), 0);
    }

    pub fn complete_retrieval_with(&self, items: Vec<LocalFeedItem>, timestamp: DateTime<Utc>) {
        self.complete_retrieval(Ok(Some(CachedFeed { items, timestamp })), 0);
    }
}

impl FeedStore for FeedStoreSpy {
    fn delete_cached_feed(&self, completion: Completion<Result<()>>) {
        self.messages
            .lock()
            .unwrap()
            .push(FeedStoreMessage::DeleteCachedFeed);
        self.deletions.lock().unwrap().push(Some(completion));
    }

    fn insert(
        &self,
        items: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<Result<()>>,
    ) {
        self.messages
            .lock()
            .unwrap()
            .push(FeedStoreMessage::Insert(items, timestamp));
        self.insertions.lock().unwrap().push(Some(completion));
    }

    fn retrieve(&self, completion: Completion<Result<Option<CachedFeed>>>) {
        self.messages.lock().unwrap().push(FeedStoreMessage::Retrieve);
        self.retrievals.lock().unwrap().push(Some(completion));
    }
}

/// Messages an image data store receives, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDataStoreMessage {
    Retrieve(Url),
    Insert(Vec<u8>, Url),
}

#[derive(Default)]
pub struct ImageDataStoreSpy {
    messages: Mutex<Vec<ImageDataStoreMessage>>,
    retrievals: Mutex<Vec<Option<Completion<Result<Option<Vec<u8>>>>>>>,
    insertions: Mutex<Vec<Option<Completion<Result<()>>>>>,
}

impl ImageDataStoreSpy {
    pub fn messages(&self) -> Vec<ImageDataStoreMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn complete_retrieval(&self, result: Result<Option<Vec<u8>>>, index: usize) {
        take_completion(&self.retrievals, index)(result);
    }

    pub fn complete_insertion(&self, result: Result<()>, index: usize) {
        take_completion(&self.insertions, index)(result);
    }
}

impl ImageDataStore for ImageDataStoreSpy {
    fn retrieve_image_data(&self, url: &Url, completion: Completion<Result<Option<Vec<u8>>>>) {
        self.messages
            .lock()
            .unwrap()
            .push(ImageDataStoreMessage::Retrieve(url.clone()));
        self.retrievals.lock().unwrap().push(Some(completion));
    }

    fn insert_image_data(&self, data: Vec<u8>, url: &Url, completion: Completion<Result<()>>) {
        self.messages
            .lock()
            .unwrap()
            .push(ImageDataStoreMessage::Insert(data, url.clone()));
        self.insertions.lock().unwrap().push(Some(completion));
    }
}
