//! Catalog data model.
//!
//! A [`Catalog`] is the ordered list of pages available for one version (or
//! for the whole site when unversioned). Catalogs are replaced wholesale on
//! load and never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::slug::slug;

/// A document entry of a catalog manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Display title; its slug is the page identity.
    pub title: String,
    /// Document path relative to the docs root.
    pub file: String,
}

impl Page {
    /// Create a page.
    #[must_use]
    pub fn new(title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: file.into(),
        }
    }

    /// Slug derived from the title.
    #[must_use]
    pub fn slug(&self) -> String {
        slug(&self.title)
    }
}

/// Two pages of one catalog that share a slug.
///
/// Only the first page in catalog order is reachable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlugCollision {
    /// Shared slug.
    pub slug: String,
    /// Title of the reachable page.
    pub winner: String,
    /// Title of the unreachable page.
    pub shadowed: String,
}

/// Ordered pages of one version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pages: Vec<Page>,
}

impl Catalog {
    /// Create a catalog from pages in display order.
    #[must_use]
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Parse a catalog manifest (JSON array of `{ title, file }`).
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the JSON has the wrong shape or
    /// an entry has an empty `file`.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let pages: Vec<Page> = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if let Some(index) = pages.iter().position(|p| p.file.trim().is_empty()) {
            return Err(format!("entry {index} has an empty file"));
        }
        Ok(Self { pages })
    }

    /// Pages in display order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// First page, the default for an empty slug.
    #[must_use]
    pub fn first(&self) -> Option<&Page> {
        self.pages.first()
    }

    /// Whether the catalog has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Position of the first page whose title slugs to `slug`.
    #[must_use]
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.slug() == slug)
    }

    /// First page whose title slugs to `slug`.
    ///
    /// Linear scan; when titles collide the earlier page wins.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Page> {
        self.position(slug).map(|i| &self.pages[i])
    }

    /// Pages shadowed by an earlier page with the same slug.
    #[must_use]
    pub fn collisions(&self) -> Vec<SlugCollision> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut collisions = Vec::new();
        for page in &self.pages {
            let page_slug = page.slug();
            match seen.get(&page_slug) {
                Some(winner) => collisions.push(SlugCollision {
                    slug: page_slug,
                    winner: (*winner).to_owned(),
                    shadowed: page.title.clone(),
                }),
                None => {
                    seen.insert(page_slug, &page.title);
                }
            }
        }
        collisions
    }
}

/// Raw version manifest as served.
#[derive(Deserialize)]
struct VersionManifestRaw {
    latest: String,
    versions: Vec<String>,
}

/// Versions published by a versioned site.
///
/// Loaded once at startup and validated up front, so the router never has to
/// re-check its shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VersionManifest {
    latest: String,
    versions: Vec<String>,
}

impl VersionManifest {
    /// Build a manifest, validating it.
    ///
    /// Duplicate versions are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if there are no versions, a
    /// version is blank, or `latest` is not one of the versions.
    pub fn new(latest: impl Into<String>, versions: Vec<String>) -> Result<Self, String> {
        let latest = latest.into();
        let mut unique: Vec<String> = Vec::with_capacity(versions.len());
        for version in versions {
            if version.trim().is_empty() {
                return Err("versions must not contain blank entries".to_owned());
            }
            if !unique.contains(&version) {
                unique.push(version);
            }
        }
        if unique.is_empty() {
            return Err("versions must not be empty".to_owned());
        }
        if !unique.contains(&latest) {
            return Err(format!("latest version {latest:?} is not listed in versions"));
        }
        Ok(Self {
            latest,
            versions: unique,
        })
    }

    /// Parse and validate a manifest (`{ "latest": …, "versions": [...] }`).
    ///
    /// # Errors
    ///
    /// Returns a description of the problem on malformed JSON or a manifest
    /// rejected by [`VersionManifest::new`].
    pub fn from_json(json: &str) -> Result<Self, String> {
        let raw: VersionManifestRaw = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::new(raw.latest, raw.versions)
    }

    /// Declared latest version.
    #[must_use]
    pub fn latest(&self) -> &str {
        &self.latest
    }

    /// All versions in manifest order.
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Whether `version` is published.
    #[must_use]
    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    /// `requested` if published, otherwise the latest version.
    #[must_use]
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(version) if self.contains(version) => version,
            _ => &self.latest,
        }
    }
}
