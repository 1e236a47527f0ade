// Remote image data loader.
// Fetches raw image payloads over HTTP behind a cancellable task.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::completion::{Completion, CompletionSlot};
use crate::error::RemoteError;
use crate::feed::{ImageDataLoader, ImageDataTask};

use super::client::{HttpClient, HttpClientTask, HttpResult};

/// Loads image payloads from their remote URLs.
pub struct RemoteImageLoader<C> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    client: C,
}

impl<C: HttpClient + 'static> RemoteImageLoader<C> {
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(Inner { client }),
        }
    }
}

impl<C: HttpClient + 'static> ImageDataLoader for RemoteImageLoader<C> {
    type Error = RemoteError;

    fn load_image_data(
        &self,
        url: &Url,
        completion: Completion<Result<Vec<u8>, RemoteError>>,
    ) -> Box<dyn ImageDataTask> {
        let task = Arc::new(RemoteImageDataTask::new(completion));
        let loader: Weak<Inner<C>> = Arc::downgrade(&self.inner);
        let pending = Arc::clone(&task);

        let http_task = self.inner.client.get(
            url,
            Box::new(move |result| {
                if loader.upgrade().is_none() {
                    return;
                }
                if !pending.complete(map_response(result)) {
                    debug!("image data task was cancelled, dropping result");
                }
            }),
        );
        task.wrap(http_task);

        Box::new(task)
    }
}

fn map_response(result: HttpResult) -> Result<Vec<u8>, RemoteError> {
    let response = result.map_err(|_| RemoteError::Connectivity)?;
    if response.status == StatusCode::OK && !response.body.is_empty() {
        Ok(response.body)
    } else {
        debug!(status = %response.status, len = response.body.len(), "rejecting image response");
        Err(RemoteError::InvalidData)
    }
}

/// Task returned for a remote image request.
///
/// Cancelling aborts the underlying fetch and drops the completion.
struct RemoteImageDataTask {
    slot: CompletionSlot<Result<Vec<u8>, RemoteError>>,
    http_task: Mutex<Option<Box<dyn HttpClientTask>>>,
}

impl RemoteImageDataTask {
    fn new(completion: Completion<Result<Vec<u8>, RemoteError>>) -> Self {
        Self {
            slot: CompletionSlot::new(completion),
            http_task: Mutex::new(None),
        }
    }

    fn wrap(&self, http_task: Box<dyn HttpClientTask>) {
        *self.http_task.lock().unwrap_or_else(PoisonError::into_inner) = Some(http_task);
    }

    fn complete(&self, result: Result<Vec<u8>, RemoteError>) -> bool {
        self.slot.complete(result)
    }
}

impl ImageDataTask for RemoteImageDataTask {
    fn cancel(&self) {
        let http_task = self
            .http_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(http_task) = http_task {
            http_task.cancel();
        }
        self.slot.invalidate();
    }
}
