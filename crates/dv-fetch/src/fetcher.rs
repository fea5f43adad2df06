//! Fetcher trait and error types.
//!
//! Provides the core [`Fetcher`] trait for retrieving site resources, along
//! with [`FetchError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! All path parameters are **site-relative resource paths**, exactly as a
//! browser would resolve them against the page that hosts the viewer:
//! - `"versions.json"` - version manifest
//! - `"docs/v2/pages.json"` - per-version catalog
//! - `"docs/v2/intro.md"` - document body
//!
//! Absolute `http(s)://` URLs are passed through untouched by backends that
//! can reach them.

use async_trait::async_trait;

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Resource answered with a non-success status.
    Status,
    /// Invalid path (e.g. escapes the site root).
    InvalidPath,
    /// Transport failure (connection refused, DNS, TLS).
    Network,
    /// Other/unknown error category.
    Other,
}

/// Fetch error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct FetchError {
    /// Semantic error category.
    pub kind: FetchErrorKind,
    /// HTTP-style status code, when the backend produced one.
    pub status: Option<u16>,
    /// Resource path the error refers to.
    pub path: Option<String>,
    /// Backend identifier (e.g., "Fs", "Http", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    /// Create a new fetch error.
    #[must_use]
    pub fn new(kind: FetchErrorKind) -> Self {
        Self {
            kind,
            status: None,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            status: Some(404),
            ..Self::new(FetchErrorKind::NotFound).with_path(path)
        }
    }

    /// Create an error for a non-success response status.
    ///
    /// A `404` is classified as [`FetchErrorKind::NotFound`].
    #[must_use]
    pub fn status(code: u16, path: impl Into<String>) -> Self {
        let kind = if code == 404 {
            FetchErrorKind::NotFound
        } else {
            FetchErrorKind::Status
        };
        Self {
            status: Some(code),
            ..Self::new(kind).with_path(path)
        }
    }

    /// Create a fetch error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => FetchErrorKind::NotFound,
            std::io::ErrorKind::InvalidInput => FetchErrorKind::InvalidPath,
            _ => FetchErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind 503: message (path: docs/intro.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            FetchErrorKind::NotFound => "Not found",
            FetchErrorKind::Status => "Unexpected status",
            FetchErrorKind::InvalidPath => "Invalid path",
            FetchErrorKind::Network => "Network error",
            FetchErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if self.kind == FetchErrorKind::Status
            && let Some(status) = self.status
        {
            write!(f, " {status}")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }

        Ok(())
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Retrieval of site resources as text.
///
/// The viewer runs on a single-threaded event loop, so returned futures are
/// not required to be `Send`.
///
/// Implementations must fail with a [`FetchError`] when the resource is
/// missing or answers with a non-success status; a success always carries
/// the full body.
#[async_trait(?Send)]
pub trait Fetcher {
    /// Fetch the resource at `path` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the resource is missing, the response status
    /// is not a success, or the transport fails.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}
