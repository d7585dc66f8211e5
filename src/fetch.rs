//! The fetch module retrieves the raw HTML of a single page.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::constants::{FETCH_TIMEOUT, USER_AGENT};

/// Ways a page retrieval can fail.
#[derive(Error, Debug)]
pub enum FetchError {
    /// DNS, connection, TLS, timeout or body read failure.
    #[error("Could not fetch the URL: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("Could not fetch the URL: {url} responded with {status}")]
    Status { url: String, status: StatusCode },
}

/// Source of page HTML.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Retrieves the body of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be retrieved or does not answer with 2xx.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`Fetch`] implementation doing one bounded HTTP GET per call.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the fixed page timeout and default redirect policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised (e.g. TLS backend failure).
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        info!("Fetching {url}");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = response.text().await?;
        debug!("Fetched {} bytes from {url} with {status}", html.len());

        Ok(html)
    }
}
