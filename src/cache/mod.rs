// Cache module for the local feed snapshot and image payloads.
// Holds the freshness policy, store contracts, local loaders and store backends.

pub mod feed_loader;
pub mod fs_store;
pub mod image_loader;
pub mod memory_store;
pub mod paths;
pub mod policy;
pub mod store;


pub use feed_loader::{CurrentDate, LocalFeedLoader};
pub use fs_store::FileSystemStore;
pub use image_loader::LocalImageDataLoader;
pub use memory_store::InMemoryStore;
pub use store::{CachedFeed, FeedStore, ImageDataStore, LocalFeedItem};
