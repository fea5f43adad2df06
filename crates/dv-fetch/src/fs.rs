//! Filesystem fetcher.
//!
//! Serves resource paths from a site directory on disk, the same tree a
//! static host would publish.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::fetcher::{FetchError, FetchErrorKind, Fetcher};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Fetcher backed by a local site directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Create a fetcher rooted at the given site directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Site root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource path to a file under the site root.
    ///
    /// Query strings and fragments are ignored. Paths that would escape the
    /// root are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = path
            .split(['?', '#'])
            .next()
            .unwrap_or(path)
            .trim_start_matches('/');

        let invalid = || {
            FetchError::new(FetchErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND)
        };

        if relative.is_empty() || relative.contains("://") {
            return Err(invalid());
        }

        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(invalid());
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait(?Send)]
impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        tracing::debug!(path = %path, file = %file.display(), "Reading site resource");

        match tokio::fs::metadata(&file).await {
            Ok(meta) if meta.is_dir() => {
                return Err(FetchError::not_found(path).with_backend(BACKEND));
            }
            Ok(_) => {}
            Err(e) => return Err(FetchError::io(e, path).with_backend(BACKEND)),
        }

        tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| FetchError::io(e, path).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn site() -> (TempDir, FsFetcher) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/v2")).unwrap();
        std::fs::write(dir.path().join("docs/v2/intro.md"), "# Intro\n").unwrap();
        std::fs::write(dir.path().join("versions.json"), "{}").unwrap();
        let fetcher = FsFetcher::new(dir.path().to_path_buf());
        (dir, fetcher)
    }

    #[tokio::test]
    async fn test_fetch_existing_file() {
        let (_dir, fetcher) = site();

        let body = fetcher.fetch("docs/v2/intro.md").await.unwrap();

        assert_eq!(body, "# Intro\n");
    }

    #[tokio::test]
    async fn test_fetch_leading_slash_and_query() {
        let (_dir, fetcher) = site();

        let body = fetcher.fetch("/versions.json?t=1").await.unwrap();

        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let (_dir, fetcher) = site();

        let err = fetcher.fetch("docs/v2/missing.md").await.unwrap_err();

        assert_eq!(err.kind, FetchErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.path.as_deref(), Some("docs/v2/missing.md"));
    }

    #[tokio::test]
    async fn test_fetch_directory_is_not_found() {
        let (_dir, fetcher) = site();

        let err = fetcher.fetch("docs/v2").await.unwrap_err();

        assert_eq!(err.kind, FetchErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_rejects_parent_traversal() {
        let (_dir, fetcher) = site();

        let err = fetcher.fetch("docs/../../etc/passwd").await.unwrap_err();

        assert_eq!(err.kind, FetchErrorKind::InvalidPath);
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_and_urls() {
        let (_dir, fetcher) = site();

        assert_eq!(
            fetcher.fetch("").await.unwrap_err().kind,
            FetchErrorKind::InvalidPath
        );
        assert_eq!(
            fetcher
                .fetch("https://example.com/a.md")
                .await
                .unwrap_err()
                .kind,
            FetchErrorKind::InvalidPath
        );
    }
}
