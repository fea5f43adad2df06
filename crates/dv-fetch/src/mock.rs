//! Mock fetcher implementation for testing.
//!
//! Provides [`MockFetcher`] for unit testing without filesystem or network access.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::fetcher::{FetchError, Fetcher};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock fetcher for testing.
///
/// Stores resource bodies in memory. Use the builder methods to configure the
/// mock with test data. Unknown paths fail with a 404.
///
/// # Example
///
/// ```ignore
/// use dv_fetch::{Fetcher, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_resource("versions.json", r#"{"latest":"v2","versions":["v2"]}"#)
///     .with_status("docs/v2/broken.md", 500);
///
/// let body = fetcher.fetch("versions.json").await.unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    resources: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    requests: RefCell<Vec<String>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path`.
    #[must_use]
    pub fn with_resource(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.resources.insert(path.into(), body.into());
        self
    }

    /// Answer `path` with a non-success status.
    #[must_use]
    pub fn with_status(mut self, path: impl Into<String>, status: u16) -> Self {
        self.statuses.insert(path.into(), status);
        self
    }

    /// Delay the response for `path` by `delay`.
    ///
    /// Uses the tokio timer, so paused-clock tests advance deterministically.
    #[must_use]
    pub fn with_delay(mut self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    /// Paths requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Number of times `path` was requested.
    #[must_use]
    pub fn request_count(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|p| *p == path).count()
    }
}

#[async_trait(?Send)]
impl Fetcher for MockFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(path.to_owned());

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(status) = self.statuses.get(path) {
            return Err(FetchError::status(*status, path).with_backend(BACKEND));
        }

        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::not_found(path).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchErrorKind;

    #[tokio::test]
    async fn test_mock_serves_resource() {
        let fetcher = MockFetcher::new().with_resource("a.md", "# A");

        assert_eq!(fetcher.fetch("a.md").await.unwrap(), "# A");
        assert_eq!(fetcher.requests(), vec!["a.md".to_owned()]);
    }

    #[tokio::test]
    async fn test_mock_unknown_path_is_not_found() {
        let fetcher = MockFetcher::new();

        let err = fetcher.fetch("missing.md").await.unwrap_err();

        assert_eq!(err.kind, FetchErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[tokio::test]
    async fn test_mock_status_overrides_resource() {
        let fetcher = MockFetcher::new()
            .with_resource("a.md", "# A")
            .with_status("a.md", 500);

        let err = fetcher.fetch("a.md").await.unwrap_err();

        assert_eq!(err.kind, FetchErrorKind::Status);
        assert_eq!(err.status, Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_delay_uses_tokio_clock() {
        let fetcher = MockFetcher::new()
            .with_resource("slow.md", "slow")
            .with_delay("slow.md", Duration::from_secs(5));
        let started = tokio::time::Instant::now();

        let body = fetcher.fetch("slow.md").await.unwrap();

        assert_eq!(body, "slow");
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert_eq!(fetcher.request_count("slow.md"), 1);
    }
}
