//! Navigation state.

use serde::Serialize;

/// What is currently rendered.
///
/// The URL hash is the source of truth; this is a cache re-derived on every
/// route trigger, used to sync the sidebar and to skip redundant catalog
/// reloads. Only the router writes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// Version whose catalog is loaded (`None` before the first load and on
    /// unversioned sites).
    pub current_version: Option<String>,
    /// Slug of the page being displayed.
    pub active_slug: Option<String>,
}
