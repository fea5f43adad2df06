//! Application state.

use std::path::PathBuf;

/// State shared across handlers.
#[derive(Debug)]
pub(crate) struct AppState {
    /// Site root directory.
    pub(crate) root: PathBuf,
    /// Document shell served for client-side routes.
    pub(crate) index: PathBuf,
}

impl AppState {
    pub(crate) fn new(root: PathBuf) -> Self {
        let index = root.join("index.html");
        Self { root, index }
    }
}
