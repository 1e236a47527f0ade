// Cache path utilities.
// Constructs filesystem paths for the feed snapshot and image payloads under a cache root.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use url::Url;

/// Get the default cache directory (~/.cache/feedfetcher on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "feedfetcher").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the feed snapshot document.
pub fn feed_path(root: &Path) -> PathBuf {
    root.join("feed.json")
}

/// Path to the directory holding image payloads.
pub fn images_dir(root: &Path) -> PathBuf {
    root.join("images")
}

/// Path to the payload file for an image URL.
pub fn image_path(root: &Path, url: &Url) -> PathBuf {
    images_dir(root).join(image_file_name(url))
}

/// File name for an image URL: the hex SHA-256 of the URL.
/// URLs can exceed file name limits and contain separators, digests cannot.
fn image_file_name(url: &Url) -> String {
    hex::encode(Sha256::digest(url.as_str().as_bytes()))
}
