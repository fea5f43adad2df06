//! Manifest and catalog loading.

use std::rc::Rc;

use dv_fetch::Fetcher;

use crate::catalog::{Catalog, VersionManifest};
use crate::error::Error;
use crate::options::SiteLayout;

/// Fetches the version manifest and per-version catalogs.
///
/// Stateless: the caller owns whatever it loads.
#[derive(Clone)]
pub struct CatalogLoader {
    fetcher: Rc<dyn Fetcher>,
    layout: SiteLayout,
}

impl CatalogLoader {
    /// Create a loader for `layout`.
    #[must_use]
    pub fn new(fetcher: Rc<dyn Fetcher>, layout: SiteLayout) -> Self {
        Self { fetcher, layout }
    }

    /// Site layout in use.
    #[must_use]
    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Fetch and validate the version manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestFetch`] if the manifest is missing or answers
    /// with a non-success status, and [`Error::InvalidManifest`] if it has the
    /// wrong shape or the layout is unversioned.
    pub async fn load_versions(&self) -> Result<VersionManifest, Error> {
        let Some(path) = self.layout.manifest_path() else {
            return Err(Error::InvalidManifest {
                path: String::new(),
                reason: "site layout is unversioned".to_owned(),
            });
        };

        let body = self
            .fetcher
            .fetch(path)
            .await
            .map_err(|source| Error::ManifestFetch {
                path: path.to_owned(),
                source,
            })?;

        let manifest =
            VersionManifest::from_json(&body).map_err(|reason| Error::InvalidManifest {
                path: path.to_owned(),
                reason,
            })?;

        tracing::debug!(
            path = %path,
            latest = %manifest.latest(),
            versions = manifest.versions().len(),
            "Version manifest loaded"
        );
        Ok(manifest)
    }

    /// Fetch the catalog of `version` (`None` on unversioned sites).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatalogFetch`] if the catalog is missing, answers with
    /// a non-success status, or has the wrong shape.
    pub async fn load_catalog(&self, version: Option<&str>) -> Result<Catalog, Error> {
        let path = self.layout.catalog_path(version);
        let catalog_error = |reason: String| Error::CatalogFetch {
            version: version.map(str::to_owned),
            path: path.clone(),
            reason,
        };

        let body = self
            .fetcher
            .fetch(&path)
            .await
            .map_err(|e| catalog_error(e.to_string()))?;
        let catalog = Catalog::from_json(&body).map_err(catalog_error)?;

        tracing::debug!(path = %path, pages = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}
