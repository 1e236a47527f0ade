// Remote feed loader.
// Fetches the feed document over HTTP and maps it into domain items.

use std::sync::{Arc, Weak};

use url::Url;

use crate::completion::Completion;
use crate::error::RemoteError;
use crate::feed::{FeedItem, FeedLoader};

use super::client::{HttpClient, HttpResult};
use super::types::map_feed;

/// Loads the feed from a remote URL, one request per call.
pub struct RemoteFeedLoader<C> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    url: Url,
    client: C,
}

impl<C: HttpClient + 'static> RemoteFeedLoader<C> {
    pub fn new(url: Url, client: C) -> Self {
        Self {
            inner: Arc::new(Inner { url, client }),
        }
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Load the feed from `url` instead of the configured one.
    pub fn load_from(&self, url: &Url, completion: Completion<Result<Vec<FeedItem>, RemoteError>>) {
        let loader: Weak<Inner<C>> = Arc::downgrade(&self.inner);

        // The request runs to completion even if nobody is left to hear about it.
        let _task = self.inner.client.get(
            url,
            Box::new(move |result| {
                if loader.upgrade().is_none() {
                    return;
                }
                completion(map_response(result));
            }),
        );
    }
}

fn map_response(result: HttpResult) -> Result<Vec<FeedItem>, RemoteError> {
    let response = result.map_err(|_| RemoteError::Connectivity)?;
    let items = map_feed(&response.body, response.status)?;
    Ok(items.into_iter().map(FeedItem::from).collect())
}

impl<C: HttpClient + 'static> FeedLoader for RemoteFeedLoader<C> {
    type Error = RemoteError;

    fn load(&self, completion: Completion<Result<Vec<FeedItem>, RemoteError>>) {
        self.load_from(&self.inner.url, completion);
    }
}
