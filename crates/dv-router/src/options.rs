//! Router configuration.

use std::time::Duration;

/// Placeholder replaced by the version name in catalog templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Default fade-out delay before content is swapped.
pub const DEFAULT_FADE_DELAY: Duration = Duration::from_millis(250);

/// Default viewport width (px) at or below which the sidebar is a drawer.
pub const DEFAULT_MENU_BREAKPOINT: u32 = 768;

/// Where manifests and documents live, relative to the site root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteLayout {
    /// One catalog per version, selected through a version manifest.
    Versioned {
        /// Version manifest path (e.g. `versions.json`).
        manifest: String,
        /// Catalog path template containing `{version}`.
        catalog: String,
        /// Directory holding `<version>/<file>` documents.
        docs_root: String,
    },
    /// A single catalog for the whole site.
    Unversioned {
        /// Catalog path.
        catalog: String,
        /// Directory holding `<file>` documents.
        docs_root: String,
    },
}

impl SiteLayout {
    /// Versioned layout with the conventional paths.
    #[must_use]
    pub fn versioned() -> Self {
        Self::Versioned {
            manifest: "versions.json".to_owned(),
            catalog: "docs/{version}/pages.json".to_owned(),
            docs_root: "docs".to_owned(),
        }
    }

    /// Unversioned layout with the conventional paths.
    #[must_use]
    pub fn unversioned() -> Self {
        Self::Unversioned {
            catalog: "docs/pages.json".to_owned(),
            docs_root: "docs".to_owned(),
        }
    }

    /// Whether the hash carries a version segment.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        matches!(self, Self::Versioned { .. })
    }

    /// Version manifest path, for versioned layouts.
    #[must_use]
    pub fn manifest_path(&self) -> Option<&str> {
        match self {
            Self::Versioned { manifest, .. } => Some(manifest),
            Self::Unversioned { .. } => None,
        }
    }

    /// Catalog path for `version`.
    #[must_use]
    pub fn catalog_path(&self, version: Option<&str>) -> String {
        match self {
            Self::Versioned { catalog, .. } => {
                catalog.replace(VERSION_PLACEHOLDER, version.unwrap_or_default())
            }
            Self::Unversioned { catalog, .. } => catalog.clone(),
        }
    }

    /// Resource path of a page's document.
    ///
    /// Absolute URLs are kept as-is. A `file` already rooted at the docs
    /// root (or the version directory) is not prefixed twice.
    #[must_use]
    pub fn document_path(&self, version: Option<&str>, file: &str) -> String {
        if file.starts_with("http://") || file.starts_with("https://") {
            return file.to_owned();
        }

        let file = file.trim_start_matches("./").trim_start_matches('/');
        let base = match (self, version) {
            (Self::Versioned { docs_root, .. }, Some(version)) => {
                join(docs_root.trim_end_matches('/'), version)
            }
            (Self::Versioned { docs_root, .. } | Self::Unversioned { docs_root, .. }, _) => {
                docs_root.trim_end_matches('/').to_owned()
            }
        };

        if base.is_empty() {
            return file.to_owned();
        }
        if file.starts_with(&format!("{base}/")) {
            return file.to_owned();
        }
        join(&base, file)
    }
}

/// Join two path fragments with a single `/`.
fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_owned()
    } else {
        format!("{base}/{rest}")
    }
}

/// What the router does when a slug matches no page.
///
/// Exactly one policy is active per router.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NotFoundPolicy {
    /// Display the first page of the catalog and mark it active.
    Fallback,
    /// Send the browser to a dedicated "not found" resource.
    Redirect {
        /// Target URL.
        url: String,
    },
    /// Rewrite the hash to the first page, re-entering the router.
    #[default]
    Rewrite,
}

/// Router configuration.
#[derive(Clone, Debug)]
pub struct RouterOptions {
    /// Resource layout of the site.
    pub layout: SiteLayout,
    /// Not-found policy.
    pub not_found: NotFoundPolicy,
    /// Fade-out time before content is swapped.
    pub fade_delay: Duration,
    /// Viewport width at or below which the sidebar collapses into a drawer.
    pub menu_breakpoint: u32,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            layout: SiteLayout::versioned(),
            not_found: NotFoundPolicy::default(),
            fade_delay: DEFAULT_FADE_DELAY,
            menu_breakpoint: DEFAULT_MENU_BREAKPOINT,
        }
    }
}
