//! Platform seams.
//!
//! The router never touches a browser (or a terminal) directly. Everything
//! it needs from its host goes through the traits below, bundled once into
//! [`Services`]. All of them take `&self`: hosts are single-threaded and use
//! interior mutability the way DOM handles do.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use dv_fetch::Fetcher;
use dv_renderer::{Highlighter, Render};

use crate::sidebar::{Sidebar, VersionSelector};

/// Fire-and-forget task run on the host's event loop.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Timer used for the content transition delay.
#[async_trait(?Send)]
pub trait Timer {
    /// Resolve after `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Spawner for local (non-`Send`) tasks.
pub trait Spawn {
    /// Run `task` to completion in the background.
    fn spawn(&self, task: LocalTask);
}

/// The content region of the page.
pub trait ContentSurface {
    /// Add a CSS class to the region.
    fn add_class(&self, class: &str);

    /// Remove a CSS class from the region.
    fn remove_class(&self, class: &str);

    /// Replace the region's HTML.
    fn set_html(&self, html: &str);

    /// Scroll the region back to the top.
    fn scroll_to_top(&self);

    /// Run `highlighter` over every embedded code block.
    ///
    /// Returns the number of blocks visited.
    fn highlight_code_blocks(&self, highlighter: &dyn Highlighter) -> usize;

    /// Call `callback` the next time the region's animation ends.
    ///
    /// The subscription is one-shot: it is dropped after firing once.
    fn on_animation_end_once(&self, callback: Box<dyn FnOnce()>);
}

/// The page around the content region.
pub trait Shell {
    /// Replace the sidebar links.
    fn render_sidebar(&self, sidebar: &Sidebar);

    /// Replace the version selector options.
    fn render_version_selector(&self, selector: &VersionSelector);

    /// Write the URL hash.
    ///
    /// The host must deliver the change back to the router as a normal
    /// hash-change trigger; the router does not re-enter itself.
    fn set_hash(&self, hash: &str);

    /// Navigate away to another resource.
    fn redirect(&self, url: &str);

    /// Surface a catalog loading failure next to the navigation.
    fn show_catalog_error(&self, message: &str);

    /// Show or hide the sidebar drawer on narrow viewports.
    fn set_menu_open(&self, open: bool);
}

/// Host implementations injected into the router.
#[derive(Clone)]
pub struct Services {
    /// Manifest and document fetching.
    pub fetcher: Rc<dyn Fetcher>,
    /// Transition delay timer.
    pub timer: Rc<dyn Timer>,
    /// Background task spawner.
    pub spawner: Rc<dyn Spawn>,
    /// Content region.
    pub surface: Rc<dyn ContentSurface>,
    /// Sidebar, selector and location.
    pub shell: Rc<dyn Shell>,
    /// Markdown to HTML conversion.
    pub renderer: Rc<dyn Render>,
    /// Code block highlighting.
    pub highlighter: Rc<dyn Highlighter>,
}
