// HTTP transport for the remote loaders.
// Defines the fetch capability and its reqwest-backed implementation.

use std::time::Duration;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::debug;
use url::Url;

use crate::completion::Completion;
use crate::config::Config;
use crate::error::{Error, Result};

const USER_AGENT_VALUE: &str = "feedfetcher";

/// Status and body of a response that made it back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Outcome of a fetch: a response of any status, or a transport error.
pub type HttpResult = Result<HttpResponse>;

/// Handle to an in-flight fetch.
pub trait HttpClientTask: Send + Sync {
    /// Abort the fetch; a pending delivery will not happen.
    fn cancel(&self);
}

/// Fetches a URL and delivers the outcome exactly once.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &Url, completion: Completion<HttpResult>) -> Box<dyn HttpClientTask>;
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn get(&self, url: &Url, completion: Completion<HttpResult>) -> Box<dyn HttpClientTask> {
        (**self).get(url, completion)
    }
}

/// HTTP client that runs each fetch as a task on a tokio runtime.
pub struct ReqwestHttpClient {
    client: Client,
    runtime: Handle,
}

impl ReqwestHttpClient {
    /// Create a client with the given request timeout, spawning fetches on `runtime`.
    pub fn new(timeout: Duration, runtime: Handle) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client, runtime })
    }

    /// Create a client from configuration on the current runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Other(e.to_string()))?;
        Self::new(config.http_timeout, runtime)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &Url, completion: Completion<HttpResult>) -> Box<dyn HttpClientTask> {
        let client = self.client.clone();
        let url = url.clone();

        let handle = self.runtime.spawn(async move {
            let result = fetch(&client, url).await;
            completion(result);
        });

        Box::new(ReqwestTask { handle })
    }
}

/// Issue a GET request and read the whole body.
async fn fetch(client: &Client, url: Url) -> HttpResult {
    debug!(%url, "fetching");
    let response = client.get(url).send().await.map_err(Error::Http)?;
    let status = response.status();
    let body = response.bytes().await.map_err(Error::Http)?;
    Ok(HttpResponse::new(status, body.to_vec()))
}

struct ReqwestTask {
    handle: JoinHandle<()>,
}

impl HttpClientTask for ReqwestTask {
    fn cancel(&self) {
        self.handle.abort();
    }
}
