//! HTTP fetcher.
//!
//! Fetches resources from a site published on an HTTP host using a blocking
//! `ureq` agent moved onto tokio's blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use ureq::Agent;

use crate::fetcher::{FetchError, FetchErrorKind, Fetcher};

/// Backend identifier for error messages.
const BACKEND: &str = "Http";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Fetcher backed by an HTTP site.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: Agent,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher for the site at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create a fetcher with a custom request timeout.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a resource path against the base URL.
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

/// Perform a blocking GET and classify the outcome.
fn get_blocking(agent: &Agent, url: &str, path: &str) -> Result<String, FetchError> {
    let mut response = agent.get(url).call().map_err(|e| {
        FetchError::new(FetchErrorKind::Network)
            .with_path(path)
            .with_backend(BACKEND)
            .with_source(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::status(status.as_u16(), path).with_backend(BACKEND));
    }

    response.body_mut().read_to_string().map_err(|e| {
        FetchError::new(FetchErrorKind::Other)
            .with_path(path)
            .with_backend(BACKEND)
            .with_source(e)
    })
}

#[async_trait(?Send)]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        tracing::debug!(url = %url, "Fetching site resource");

        let agent = self.agent.clone();
        let owned_path = path.to_owned();
        tokio::task::spawn_blocking(move || get_blocking(&agent, &url, &owned_path))
            .await
            .map_err(|e| {
                FetchError::new(FetchErrorKind::Other)
                    .with_path(path)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let fetcher = HttpFetcher::new("https://docs.example.com/");

        assert_eq!(fetcher.base_url(), "https://docs.example.com");
    }

    #[test]
    fn test_url_for_relative_path() {
        let fetcher = HttpFetcher::new("https://docs.example.com/site");

        assert_eq!(
            fetcher.url_for("docs/v2/intro.md"),
            "https://docs.example.com/site/docs/v2/intro.md"
        );
        assert_eq!(
            fetcher.url_for("/versions.json"),
            "https://docs.example.com/site/versions.json"
        );
    }

    #[test]
    fn test_url_for_absolute_url_passes_through() {
        let fetcher = HttpFetcher::new("https://docs.example.com");

        assert_eq!(
            fetcher.url_for("https://cdn.example.com/a.md"),
            "https://cdn.example.com/a.md"
        );
    }
}
