//! Router error types.

use dv_fetch::FetchError;

/// Failure classes of the viewer.
///
/// None of these escape the router as faults: each is logged and turned into
/// an inline message or a navigation fallback. Only manifest failures halt
/// initialization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The version manifest could not be fetched.
    #[error("Could not load version manifest {path}: {source}")]
    ManifestFetch {
        /// Manifest resource path.
        path: String,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The version manifest was fetched but has the wrong shape.
    #[error("Invalid version manifest {path}: {reason}")]
    InvalidManifest {
        /// Manifest resource path.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A catalog could not be fetched or parsed.
    #[error("Could not load catalog {path}: {reason}")]
    CatalogFetch {
        /// Version the catalog belongs to (`None` when unversioned).
        version: Option<String>,
        /// Catalog resource path.
        path: String,
        /// Fetch or parse failure description.
        reason: String,
    },

    /// A document body could not be fetched.
    #[error("Could not load file: {path}")]
    DocumentFetch {
        /// Document resource path.
        path: String,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// No page in the active catalog has the requested slug.
    #[error("Page not found: {slug}")]
    PageNotFound {
        /// Requested slug.
        slug: String,
    },
}

impl Error {
    /// Whether this failure stops the router from routing at all.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ManifestFetch { .. } | Self::InvalidManifest { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_fetch_names_path() {
        let err = Error::DocumentFetch {
            path: "docs/v2/intro.md".to_owned(),
            source: FetchError::not_found("docs/v2/intro.md"),
        };

        assert_eq!(err.to_string(), "Could not load file: docs/v2/intro.md");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_manifest_errors_are_fatal() {
        let fetch = Error::ManifestFetch {
            path: "versions.json".to_owned(),
            source: FetchError::status(500, "versions.json"),
        };
        let invalid = Error::InvalidManifest {
            path: "versions.json".to_owned(),
            reason: "no versions".to_owned(),
        };

        assert!(fetch.is_fatal());
        assert!(invalid.is_fatal());
        assert!(
            !Error::PageNotFound {
                slug: "x".to_owned()
            }
            .is_fatal()
        );
    }
}
