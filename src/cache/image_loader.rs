// Local image data loader.
// Reads and writes image payloads through an ImageDataStore.

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::completion::{Completion, CompletionSlot};
use crate::error::{LoadImageDataError, SaveImageDataError};
use crate::feed::{ImageDataCache, ImageDataLoader, ImageDataTask};

use super::store::{ImageDataStore, ImageRetrievalResult};

/// Image data loader and cache backed by an [`ImageDataStore`].
pub struct LocalImageDataLoader<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    store: S,
}

impl<S: ImageDataStore + 'static> LocalImageDataLoader<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Inner { store }),
        }
    }
}

fn map_retrieval(retrieval: ImageRetrievalResult) -> Result<Vec<u8>, LoadImageDataError> {
    match retrieval {
        Ok(Some(data)) => Ok(data),
        Ok(None) => Err(LoadImageDataError::NotFound),
        Err(_) => Err(LoadImageDataError::Failed),
    }
}

impl<S: ImageDataStore + 'static> ImageDataLoader for LocalImageDataLoader<S> {
    type Error = LoadImageDataError;

    fn load_image_data(
        &self,
        url: &Url,
        completion: Completion<Result<Vec<u8>, LoadImageDataError>>,
    ) -> Box<dyn ImageDataTask> {
        let task = Arc::new(LocalImageDataTask {
            slot: CompletionSlot::new(completion),
        });
        let loader = Arc::downgrade(&self.inner);
        let pending = Arc::clone(&task);

        self.inner.store.retrieve_image_data(
            url,
            Box::new(move |retrieval| {
                if loader.upgrade().is_none() {
                    return;
                }
                if !pending.slot.complete(map_retrieval(retrieval)) {
                    debug!("image data task was cancelled, dropping cached result");
                }
            }),
        );

        Box::new(task)
    }
}

impl<S: ImageDataStore + 'static> ImageDataCache for LocalImageDataLoader<S> {
    type Error = SaveImageDataError;

    fn save_image_data(
        &self,
        data: Vec<u8>,
        url: &Url,
        completion: Completion<Result<(), SaveImageDataError>>,
    ) {
        let loader = Arc::downgrade(&self.inner);

        self.inner.store.insert_image_data(
            data,
            url,
            Box::new(move |insertion| {
                if loader.upgrade().is_none() {
                    return;
                }
                completion(insertion.map_err(|_| SaveImageDataError::Failed));
            }),
        );
    }
}

/// Task for a cached image read. The store call cannot be aborted, so
/// cancelling only drops the completion.
struct LocalImageDataTask {
    slot: CompletionSlot<Result<Vec<u8>, LoadImageDataError>>,
}

impl ImageDataTask for LocalImageDataTask {
    fn cancel(&self) {
        self.slot.invalidate();
    }
}
