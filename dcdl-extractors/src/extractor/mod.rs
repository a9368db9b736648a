//! Shared interface of the extractors.
//!
//! Extractors never talk to `reqwest` directly. Every page goes through a [`PageFetcher`], which
//! is [`HttpFetcher`] in production and an in-memory page table in tests.
use dcdl_common::{
    client,
    log::{debug, warn},
    reqwest::{Client, StatusCode},
};
use std::{future::Future, time::Duration};
use tokio::time::sleep;

use crate::error::ExtractorError;
use crate::extractor_config::SiteConfig;

pub mod caps;

pub use caps::AsyncFetch;

/// Static description of an extractor, used by the router and the CLI.
pub trait ExtractorInfo {
    /// Short name of the extractor kind (`board`, `post`).
    const SUBCATEGORY: &'static str;
    /// Regex matched against input URLs.
    const PATTERN: &'static str;
    /// A representative URL matched by [`PATTERN`](Self::PATTERN).
    const EXAMPLE: &'static str;
}

/// Fetches the body of a page as text.
pub trait PageFetcher {
    /// Returns the body of `url`, or the transport error that prevented it.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, ExtractorError>> + Send;
}

/// [`PageFetcher`] backed by a `reqwest::Client`.
///
/// Connection errors and `5xx`/`429` answers are retried with a linearly growing pause. Any other
/// error status is returned right away.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retries: u32,
    request_delay: Option<Duration>,
}

impl HttpFetcher {
    /// Builds a client with the configured user agent and referer.
    pub fn new(config: &SiteConfig) -> Result<Self, ExtractorError> {
        let client = client!(&config.user_agent, &config.referer())?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &SiteConfig) -> Self {
        Self {
            client,
            retries: config.retries,
            request_delay: config.request_delay(),
        }
    }

    /// Returns the used client for external use.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    #[inline]
    fn should_retry(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ExtractorError> {
        let mut attempt: u32 = 0;

        loop {
            if let Some(delay) = self.request_delay {
                sleep(delay).await;
            }

            debug!("GET {url}");
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    if !Self::should_retry(status) || attempt >= self.retries {
                        return Err(ExtractorError::ServerStatus {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    warn!("{url} returned {status}, retrying ({}/{})", attempt + 1, self.retries);
                }
                Err(error) => {
                    if attempt >= self.retries {
                        return Err(error.into());
                    }

                    warn!("Request to {url} failed: {error}, retrying ({}/{})", attempt + 1, self.retries);
                }
            }

            attempt += 1;
            sleep(Duration::from_secs(u64::from(attempt))).await;
        }
    }
}
