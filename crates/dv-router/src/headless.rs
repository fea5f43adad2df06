//! In-memory host.
//!
//! Drives the router without a browser: the content region and shell record
//! what they are asked to do, the timer is tokio's, and tasks run on the
//! current [`LocalSet`](tokio::task::LocalSet). Used by the CLI and by tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};
use std::mem;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use dv_fetch::Fetcher;
use dv_renderer::{ClassHighlighter, Highlighter, MarkdownRenderer, highlight_html};
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::host::{ContentSurface, LocalTask, Services, Shell, Spawn, Timer};
use crate::options::RouterOptions;
use crate::router::{RouteOutcome, Router};
use crate::sidebar::{Sidebar, VersionSelector};

/// Maximum number of router-initiated hash rewrites followed per navigation.
pub const MAX_HASH_HOPS: usize = 8;

/// Content region kept in memory.
#[derive(Default)]
pub struct HeadlessSurface {
    html: RefCell<String>,
    classes: RefCell<BTreeSet<String>>,
    scroll_resets: Cell<usize>,
    animation_end: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl HeadlessSurface {
    /// Current HTML.
    #[must_use]
    pub fn html(&self) -> String {
        self.html.borrow().clone()
    }

    /// Current classes, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    /// Whether `class` is applied.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    /// How many times the region was scrolled to the top.
    #[must_use]
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets.get()
    }

    /// Animation-end subscriptions not yet fired.
    #[must_use]
    pub fn pending_animation_callbacks(&self) -> usize {
        self.animation_end.borrow().len()
    }

    /// End the running animation, firing each pending subscription once.
    ///
    /// Returns the number of callbacks fired.
    pub fn finish_animation(&self) -> usize {
        let callbacks = mem::take(&mut *self.animation_end.borrow_mut());
        let fired = callbacks.len();
        for callback in callbacks {
            callback();
        }
        fired
    }
}

impl ContentSurface for HeadlessSurface {
    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_owned());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn set_html(&self, html: &str) {
        html.clone_into(&mut self.html.borrow_mut());
    }

    fn scroll_to_top(&self) {
        self.scroll_resets.set(self.scroll_resets.get() + 1);
    }

    fn highlight_code_blocks(&self, highlighter: &dyn Highlighter) -> usize {
        let (html, count) = highlight_html(&self.html.borrow(), highlighter);
        *self.html.borrow_mut() = html;
        count
    }

    fn on_animation_end_once(&self, callback: Box<dyn FnOnce()>) {
        self.animation_end.borrow_mut().push(callback);
    }
}

/// Page chrome kept in memory.
#[derive(Default)]
pub struct HeadlessShell {
    sidebar: RefCell<Sidebar>,
    selector: RefCell<VersionSelector>,
    hashes: RefCell<VecDeque<String>>,
    redirects: RefCell<Vec<String>>,
    catalog_errors: RefCell<Vec<String>>,
    menu_open: Cell<bool>,
}

impl HeadlessShell {
    /// Last rendered sidebar.
    #[must_use]
    pub fn sidebar(&self) -> Sidebar {
        self.sidebar.borrow().clone()
    }

    /// Last rendered version selector.
    #[must_use]
    pub fn selector(&self) -> VersionSelector {
        self.selector.borrow().clone()
    }

    /// Oldest hash written and not yet taken.
    pub fn take_hash(&self) -> Option<String> {
        self.hashes.borrow_mut().pop_front()
    }

    /// Redirects requested so far.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }

    /// Catalog error messages shown so far.
    #[must_use]
    pub fn catalog_errors(&self) -> Vec<String> {
        self.catalog_errors.borrow().clone()
    }

    /// Whether the drawer is shown.
    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu_open.get()
    }
}

impl Shell for HeadlessShell {
    fn render_sidebar(&self, sidebar: &Sidebar) {
        sidebar.clone_into(&mut self.sidebar.borrow_mut());
    }

    fn render_version_selector(&self, selector: &VersionSelector) {
        selector.clone_into(&mut self.selector.borrow_mut());
    }

    fn set_hash(&self, hash: &str) {
        self.hashes.borrow_mut().push_back(hash.to_owned());
    }

    fn redirect(&self, url: &str) {
        self.redirects.borrow_mut().push(url.to_owned());
    }

    fn show_catalog_error(&self, message: &str) {
        self.catalog_errors.borrow_mut().push(message.to_owned());
    }

    fn set_menu_open(&self, open: bool) {
        self.menu_open.set(open);
    }
}

/// Timer backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Spawner onto the current `LocalSet`.
///
/// Keeps the handles so callers can wait for everything spawned.
#[derive(Default)]
pub struct LocalSpawner {
    handles: RefCell<Vec<JoinHandle<()>>>,
}

impl LocalSpawner {
    /// Wait until every spawned task (including ones spawned meanwhile) ends.
    pub async fn settle(&self) {
        loop {
            let handles = mem::take(&mut *self.handles.borrow_mut());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "Background task failed");
                }
            }
        }
    }
}

impl Spawn for LocalSpawner {
    fn spawn(&self, task: LocalTask) {
        self.handles.borrow_mut().push(tokio::task::spawn_local(task));
    }
}

/// Bundle of in-memory host pieces.
pub struct HeadlessHost {
    /// Content region.
    pub surface: Rc<HeadlessSurface>,
    /// Page chrome.
    pub shell: Rc<HeadlessShell>,
    /// Task spawner.
    pub spawner: Rc<LocalSpawner>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface: Rc::new(HeadlessSurface::default()),
            shell: Rc::new(HeadlessShell::default()),
            spawner: Rc::new(LocalSpawner::default()),
        }
    }

    /// Services using this host, `fetcher`, and the default renderer and
    /// highlighter.
    #[must_use]
    pub fn services(&self, fetcher: Rc<dyn Fetcher>) -> Services {
        Services {
            fetcher,
            timer: Rc::new(TokioTimer),
            spawner: Rc::clone(&self.spawner) as Rc<dyn Spawn>,
            surface: Rc::clone(&self.surface) as Rc<dyn ContentSurface>,
            shell: Rc::clone(&self.shell) as Rc<dyn Shell>,
            renderer: Rc::new(MarkdownRenderer::new()),
            highlighter: Rc::new(ClassHighlighter),
        }
    }

    /// Wait for pending content loads.
    pub async fn settle(&self) {
        self.spawner.settle().await;
    }
}

/// A router wired to a [`HeadlessHost`], with browser-like hash delivery.
///
/// Hash writes made by the router are fed back to it, as a browser's
/// `hashchange` event would.
pub struct HeadlessSession {
    host: HeadlessHost,
    router: Router,
}

impl HeadlessSession {
    /// Wire a new router to a new host.
    #[must_use]
    pub fn new(fetcher: Rc<dyn Fetcher>, options: RouterOptions) -> Self {
        let host = HeadlessHost::new();
        let router = Router::new(host.services(fetcher), options);
        Self { host, router }
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Start the router on `hash` and settle.
    ///
    /// # Errors
    ///
    /// Returns the manifest error if the router cannot start.
    pub async fn open(&self, hash: &str) -> Result<Vec<RouteOutcome>, Error> {
        let first = self.router.start(hash).await?;
        Ok(self.follow(first).await)
    }

    /// Navigate to `hash` and settle.
    ///
    /// Returns every outcome, including those of followed rewrites.
    pub async fn navigate(&self, hash: &str) -> Vec<RouteOutcome> {
        let first = self.router.handle_route(hash).await;
        self.follow(first).await
    }

    /// Switch versions through the selector and settle.
    pub async fn select_version(&self, version: &str) -> Vec<RouteOutcome> {
        if !self.router.select_version(version) {
            return Vec::new();
        }
        match self.host.shell.take_hash() {
            Some(hash) => self.navigate(&hash).await,
            None => Vec::new(),
        }
    }

    async fn follow(&self, first: RouteOutcome) -> Vec<RouteOutcome> {
        let mut outcomes = vec![first];
        for _ in 0..MAX_HASH_HOPS {
            let Some(hash) = self.host.shell.take_hash() else {
                break;
            };
            outcomes.push(self.router.handle_route(&hash).await);
        }
        if self.host.shell.take_hash().is_some() {
            tracing::warn!(hops = MAX_HASH_HOPS, "Too many hash rewrites, giving up");
        }
        self.host.settle().await;
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use dv_fetch::MockFetcher;
    use tokio::task::LocalSet;

    use super::*;

    #[test]
    fn test_surface_records_classes() {
        let surface = HeadlessSurface::default();

        surface.add_class("b");
        surface.add_class("a");
        surface.remove_class("b");

        assert_eq!(surface.classes(), vec!["a"]);
    }

    #[test]
    fn test_animation_callbacks_fire_once() {
        let surface = Rc::new(HeadlessSurface::default());
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        surface.on_animation_end_once(Box::new(move || counter.set(counter.get() + 1)));

        assert_eq!(surface.finish_animation(), 1);
        assert_eq!(surface.finish_animation(), 0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_highlight_code_blocks() {
        let surface = HeadlessSurface::default();
        surface.set_html("<pre><code>x</code></pre><pre><code class=\"language-rust\">y</code></pre>");

        assert_eq!(surface.highlight_code_blocks(&ClassHighlighter), 2);
        assert!(surface.html().contains("hljs"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_follows_rewrites() {
        LocalSet::new()
            .run_until(async {
                let fetcher = MockFetcher::new()
                    .with_resource("versions.json", r#"{"latest":"v1","versions":["v1"]}"#)
                    .with_resource("docs/v1/pages.json", r#"[{"title":"Home","file":"home.md"}]"#)
                    .with_resource("docs/v1/home.md", "# Home");
                let session = HeadlessSession::new(Rc::new(fetcher), RouterOptions::default());

                let outcomes = session.open("#/v1/missing").await.unwrap();

                assert_eq!(outcomes.len(), 2);
                assert!(matches!(outcomes[0], RouteOutcome::Rewrote { .. }));
                assert!(matches!(outcomes[1], RouteOutcome::Displayed { .. }));
                assert!(session.host().surface.html().contains("<h1>Home</h1>"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_select_version() {
        LocalSet::new()
            .run_until(async {
                let fetcher = MockFetcher::new()
                    .with_resource("versions.json", r#"{"latest":"v2","versions":["v1","v2"]}"#)
                    .with_resource("docs/v1/pages.json", r#"[{"title":"Home","file":"home.md"}]"#)
                    .with_resource("docs/v2/pages.json", r#"[{"title":"Home","file":"home.md"}]"#)
                    .with_resource("docs/v1/home.md", "old")
                    .with_resource("docs/v2/home.md", "new");
                let session = HeadlessSession::new(Rc::new(fetcher), RouterOptions::default());
                session.open("").await.unwrap();

                let outcomes = session.select_version("v1").await;

                assert_eq!(outcomes.len(), 1);
                assert!(session.host().surface.html().contains("old"));
                assert!(session.select_version("v7").await.is_empty());
            })
            .await;
    }
}
