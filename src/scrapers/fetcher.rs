//! Raw HTTP retrieval of source pages and feeds.
//!
//! [`Fetch`] is the seam between the network and the parsers: the aggregator
//! only needs "URL in, body or [`FetchError`] out", which keeps it testable
//! against in-memory fakes.

use crate::error::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; db_news_digest/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Something that can fetch the body behind a URL.
pub trait Fetch {
    /// Perform one GET of `url` and return the body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetch`] over a shared `reqwest` client.
///
/// Non-2xx responses are reported as [`FetchError::Status`], never as content.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests each time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(http_err)?;

        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched"
        );
        Ok(body)
    }
}
