//! Client-side routing for the dv documentation viewer.
//!
//! A small state machine that maps the URL hash to a version and a page,
//! loads the page's Markdown and swaps it into the content region with a
//! fade. Platform access goes through the seams in [`host`], so the same
//! router runs in the browser (`dv-web`) and in memory ([`headless`]).
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use dv_fetch::FsFetcher;
//! use dv_router::{HeadlessSession, RouterOptions};
//!
//! let session = HeadlessSession::new(Rc::new(FsFetcher::new("site".into())), RouterOptions::default());
//! let outcomes = session.open("#/v2/getting-started").await?;
//! println!("{}", session.host().surface.html());
//! ```

mod catalog;
mod content;
mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod headless;
pub mod host;
mod loader;
mod menu;
mod options;
mod route;
mod router;
mod sidebar;
mod slug;
mod state;

pub use catalog::{Catalog, Page, SlugCollision, VersionManifest};
pub use content::{ContentLoader, FADE_IN_CLASS, FADE_OUT_CLASS, error_html, not_found_html};
pub use error::Error;
#[cfg(not(target_arch = "wasm32"))]
pub use headless::{HeadlessHost, HeadlessSession};
pub use host::{ContentSurface, LocalTask, Services, Shell, Spawn, Timer};
pub use loader::CatalogLoader;
pub use menu::MobileMenu;
pub use options::{
    DEFAULT_FADE_DELAY, DEFAULT_MENU_BREAKPOINT, NotFoundPolicy, RouterOptions, SiteLayout,
    VERSION_PLACEHOLDER,
};
pub use route::Route;
pub use router::{RouteOutcome, Router};
pub use sidebar::{NavLink, Sidebar, VersionOption, VersionSelector};
pub use slug::slug;
pub use state::NavigationState;
