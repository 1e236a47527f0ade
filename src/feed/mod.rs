// Feed domain module.
// Defines feed items and the capabilities for loading and caching feeds and image data.

use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::completion::Completion;

/// A single entry in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    id: Uuid,
    image_url: Url,
    description: Option<String>,
    location: Option<String>,
}

impl FeedItem {
    pub fn new(
        id: Uuid,
        image_url: Url,
        description: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            id,
            image_url,
            description,
            location,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Something that can deliver the feed.
pub trait FeedLoader {
    type Error;

    fn load(&self, completion: Completion<Result<Vec<FeedItem>, Self::Error>>);
}

/// Something that can persist the feed.
pub trait FeedCache {
    type Error;

    fn save(&self, items: Vec<FeedItem>, completion: Completion<Result<(), Self::Error>>);
}

/// Handle to an in-flight image data request.
pub trait ImageDataTask: Send + Sync {
    /// Stop the request and suppress any result not yet delivered.
    fn cancel(&self);
}

impl<T: ImageDataTask + ?Sized> ImageDataTask for Arc<T> {
    fn cancel(&self) {
        (**self).cancel();
    }
}

/// Something that can deliver the image payload for a URL.
pub trait ImageDataLoader {
    type Error;

    fn load_image_data(
        &self,
        url: &Url,
        completion: Completion<Result<Vec<u8>, Self::Error>>,
    ) -> Box<dyn ImageDataTask>;
}

/// Something that can persist the image payload for a URL.
pub trait ImageDataCache {
    type Error;

    fn save_image_data(
        &self,
        data: Vec<u8>,
        url: &Url,
        completion: Completion<Result<(), Self::Error>>,
    );
}
