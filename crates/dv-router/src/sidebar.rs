//! Sidebar and version selector view models.
//!
//! Hosts render these; the router owns and updates them.

use serde::Serialize;

use crate::catalog::{Catalog, VersionManifest};
use crate::route::Route;

/// One sidebar navigation link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Page title.
    pub title: String,
    /// Slug of the title.
    pub slug: String,
    /// Hash the link navigates to.
    pub href: String,
    /// Page document, relative to the docs root.
    pub file: String,
    /// Whether this link is the active one.
    pub active: bool,
}

/// Sidebar links of the loaded catalog.
///
/// At most one link is active at any time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    links: Vec<NavLink>,
}

impl Sidebar {
    /// Build the links for a catalog, none active.
    #[must_use]
    pub fn build(catalog: &Catalog, version: Option<&str>) -> Self {
        let links = catalog
            .pages()
            .iter()
            .map(|page| {
                let slug = page.slug();
                let route = match version {
                    Some(version) => Route::versioned(version, Some(slug.clone())),
                    None => Route::page(slug.clone()),
                };
                NavLink {
                    title: page.title.clone(),
                    href: route.to_hash(),
                    slug,
                    file: page.file.clone(),
                    active: false,
                }
            })
            .collect();
        Self { links }
    }

    /// Links in catalog order.
    #[must_use]
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Mark the first link with `slug` active and every other link inactive.
    ///
    /// `None` (or an unknown slug) clears the active link. Returns whether a
    /// link was activated.
    pub fn set_active(&mut self, slug: Option<&str>) -> bool {
        let target = slug.and_then(|s| self.links.iter().position(|l| l.slug == s));
        for (index, link) in self.links.iter_mut().enumerate() {
            link.active = Some(index) == target;
        }
        target.is_some()
    }

    /// The active link, if any.
    #[must_use]
    pub fn active(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }
}

/// One entry of the version selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VersionOption {
    /// Version name.
    pub version: String,
    /// Display label; the latest version is annotated.
    pub label: String,
    /// Whether this is the manifest's latest version.
    pub latest: bool,
    /// Whether this is the version being viewed.
    pub selected: bool,
}

/// Version selector contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VersionSelector {
    options: Vec<VersionOption>,
}

impl VersionSelector {
    /// Build the selector for a manifest with `active` selected.
    #[must_use]
    pub fn build(manifest: &VersionManifest, active: &str) -> Self {
        let options = manifest
            .versions()
            .iter()
            .map(|version| {
                let latest = version == manifest.latest();
                let label = if latest {
                    format!("{version} (latest)")
                } else {
                    version.clone()
                };
                VersionOption {
                    version: version.clone(),
                    label,
                    latest,
                    selected: version == active,
                }
            })
            .collect();
        Self { options }
    }

    /// Options in manifest order.
    #[must_use]
    pub fn options(&self) -> &[VersionOption] {
        &self.options
    }

    /// The selected version, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.version.as_str())
    }
}
