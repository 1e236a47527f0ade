// feedfetcher command line entry point.
// Refreshes the cache from the remote feed and prints it, falling back to the cache on failure.

use std::process::ExitCode;

use feedfetcher::{
    Error, Result,
    api::{ReqwestHttpClient, RemoteFeedLoader},
    cache::{FileSystemStore, LocalFeedLoader},
    completion,
    config::Config,
    feed::{FeedCache, FeedItem, FeedLoader},
    telemetry,
};
use tokio::runtime::Handle;
use tracing::{dispatcher, error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if dispatcher::has_been_set() {
                error!(error = %err, "no feed available");
            } else {
                eprintln!("feedfetcher: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.logging)?;

    info!(feed_url = %config.feed_url, cache_dir = %config.cache_dir.display(), "starting");

    let store = FileSystemStore::new(config.cache_dir.clone(), Handle::current());
    let local = LocalFeedLoader::with_system_clock(store);
    let client = ReqwestHttpClient::from_config(&config)?;
    let remote = RemoteFeedLoader::new(config.feed_url.clone(), client);

    if let Err(err) = wait_for(|done| local.validate_cache(done)).await {
        warn!(error = %err, "cache validation failed");
    }

    let remote_load = wait_for(|done| {
        remote.load(Box::new(move |result| done(result.map_err(Error::from))))
    });

    let items = match remote_load.await {
        Ok(items) => {
            info!(count = items.len(), "loaded remote feed");
            if let Err(err) = wait_for(|done| local.save(items.clone(), done)).await {
                warn!(error = %err, "failed to cache remote feed");
            }
            items
        }
        Err(err) => {
            warn!(error = %err, "remote feed unavailable, falling back to cache");
            let items = wait_for(|done| local.load(done)).await?;
            info!(count = items.len(), "loaded cached feed");
            items
        }
    };

    print_feed(&items);
    Ok(())
}

/// Await a callback-style operation, treating a dropped completion as an error.
async fn wait_for<T, F>(start: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(completion::Completion<Result<T>>),
{
    completion::wait(start)
        .await
        .unwrap_or_else(|| Err(Error::Other("operation ended without a result".into())))
}

fn print_feed(items: &[FeedItem]) {
    if items.is_empty() {
        println!("(no items)");
        return;
    }
    for item in items {
        println!("{}  {}", item.id(), item.image_url());
        if let Some(description) = item.description() {
            println!("    {}", description);
        }
        if let Some(location) = item.location() {
            println!("    @ {}", location);
        }
    }
}
