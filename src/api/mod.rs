// Remote API module.
// Provides the HTTP transport and the loaders that fetch the feed and image payloads.

pub mod client;
pub mod feed_loader;
pub mod image_loader;
pub mod types;

pub use client::{HttpClient, HttpClientTask, HttpResponse, HttpResult, ReqwestHttpClient};
pub use feed_loader::RemoteFeedLoader;
pub use image_loader::RemoteImageLoader;
pub use types::{RemoteFeedItem, map_feed};
