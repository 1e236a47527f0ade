// Filesystem cache store.
// Persists the feed snapshot as JSON and image payloads as files under a root directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tokio::runtime::Handle;
use url::Url;

use crate::completion::Completion;
use crate::error::Result;

use super::paths;
use super::store::{
    CachedFeed, DeletionResult, FeedStore, ImageDataStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedItem, RetrievalResult,
};

/// Store that keeps its data under a directory and runs IO on the tokio blocking pool.
///
/// Operations issued through one store instance are serialized.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
    runtime: Handle,
    lock: Arc<Mutex<()>>,
}

impl FileSystemStore {
    pub fn new(root: impl Into<PathBuf>, runtime: Handle) -> Self {
        Self {
            root: root.into(),
            runtime,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `action` off the caller's thread and deliver its result from there.
    fn perform<T, F>(&self, action: F, completion: Completion<Result<T>>)
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let root = self.root.clone();
        let lock = Arc::clone(&self.lock);

        self.runtime.spawn_blocking(move || {
            let result = {
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                action(&root)
            };
            completion(result);
        });
    }
}

impl FeedStore for FileSystemStore {
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>) {
        self.perform(|root| delete(&paths::feed_path(root)), completion);
    }

    fn insert(
        &self,
        items: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    ) {
        self.perform(
            move |root| {
                let cached = CachedFeed { items, timestamp };
                let json = serde_json::to_vec_pretty(&cached)?;
                write_atomic(&paths::feed_path(root), &json)
            },
            completion,
        );
    }

    fn retrieve(&self, completion: Completion<RetrievalResult>) {
        self.perform(|root| read_feed(&paths::feed_path(root)), completion);
    }
}

impl ImageDataStore for FileSystemStore {
    fn retrieve_image_data(&self, url: &Url, completion: Completion<ImageRetrievalResult>) {
        let url = url.clone();
        self.perform(move |root| read_bytes(&paths::image_path(root, &url)), completion);
    }

    fn insert_image_data(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>) {
        let url = url.clone();
        self.perform(
            move |root| write_atomic(&paths::image_path(root, &url), &data),
            completion,
        );
    }
}

/// Read the feed snapshot, `None` if it has never been written.
fn read_feed(path: &Path) -> Result<Option<CachedFeed>> {
    match read_bytes(path)? {
        Some(contents) => Ok(Some(serde_json::from_slice(&contents)?)),
        None => Ok(None),
    }
}

fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Write data to a uniquely named temp file beside `path`, then rename it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

fn delete(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
