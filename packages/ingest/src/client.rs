//! Outbound fetch capability.
//!
//! One fetch, one URL, one body or a [`FetchError`]. No retries here;
//! the paginator decides what a failed page means.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::types::HeaderProfile;

/// Browser identity for sources that reject non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const PLAIN_USER_AGENT: &str = "nyaya-ingest/0.1";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for outbound fetch clients (to allow mocking).
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch one fully formed URL and return the response body.
    ///
    /// Timeouts and non-2xx statuses come back as [`FetchError`], never
    /// as a panic past the caller.
    async fn fetch(&self, url: &str, headers: HeaderProfile) -> Result<String, FetchError>;
}

/// Source client backed by reqwest.
pub struct HttpSourceClient {
    client: reqwest::Client,
}

impl HttpSourceClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    fn profile_headers(profile: HeaderProfile) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match profile {
            HeaderProfile::Browser => {
                headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
                headers.insert(
                    ACCEPT,
                    HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
                    ),
                );
                headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
            }
            HeaderProfile::Plain => {
                headers.insert(USER_AGENT, HeaderValue::from_static(PLAIN_USER_AGENT));
            }
        }
        headers
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn fetch(&self, url: &str, headers: HeaderProfile) -> Result<String, FetchError> {
        debug!(url = %url, profile = ?headers, "fetching source page");

        let response = self
            .client
            .get(url)
            .headers(Self::profile_headers(headers))
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })
    }
}
