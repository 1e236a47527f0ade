// feedfetcher: loads a feed from a remote source and keeps a local snapshot of it.
// The local snapshot is served while fresh and when the remote source is unavailable.

pub mod api;
pub mod cache;
pub mod completion;
pub mod config;
pub mod error;
pub mod feed;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
