//! Browser bindings for the dv documentation viewer.
//!
//! Built with `wasm-pack build --target web crates/dv-web`, the module starts
//! itself on load. The hosting page provides:
//!
//! - `#content`: the content region (fade classes are toggled here)
//! - `#sidebar`: receives the page list; gets the `open` class on mobile
//! - `#version-selector` (optional): a `<select>`; its presence switches to
//!   a versioned layout
//! - `#menu-toggle` (optional): opens and closes the mobile drawer
//! - a global `hljs` (optional) for syntax highlighting
//!
//! Layout overrides are read from `data-*` attributes on `#content`; see
//! [`router_options`].
//!
//! The markup helpers and option parsing are target-independent; the DOM,
//! `fetch` and timer backends only exist on `wasm32`.

mod markup;
mod options;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod highlight;
#[cfg(target_arch = "wasm32")]
mod runtime;

#[cfg(target_arch = "wasm32")]
pub use dom::{WebShell, WebSurface};
#[cfg(target_arch = "wasm32")]
pub use fetch::{JsError, WebFetcher};
#[cfg(target_arch = "wasm32")]
pub use highlight::HljsHighlighter;
pub use markup::{
    ACTIVE_CLASS, MENU_OPEN_CLASS, catalog_error_html, sidebar_html, version_options_html,
};
pub use options::router_options;
#[cfg(target_arch = "wasm32")]
pub use runtime::{WebSpawner, WebTimer};
