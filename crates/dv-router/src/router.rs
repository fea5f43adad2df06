//! Hash router.
//!
//! Maps a URL hash to a version and page, keeps the sidebar and version
//! selector in sync, and hands the document off to the [`ContentLoader`].
//!
//! The hash is the single source of truth. Every trigger (initial load or a
//! hash change) re-derives the whole route, and a trigger overtaken by a
//! newer one while it awaits its catalog gives up without touching the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::catalog::{Catalog, VersionManifest};
use crate::content::{
    ContentLoader, FADE_IN_CLASS, FADE_OUT_CLASS, error_html, not_found_html,
};
use crate::error::Error;
use crate::host::Services;
use crate::loader::CatalogLoader;
use crate::menu::MobileMenu;
use crate::options::{NotFoundPolicy, RouterOptions};
use crate::route::Route;
use crate::sidebar::{Sidebar, VersionSelector};
use crate::state::NavigationState;

/// Result of one routing cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// The requested page is being displayed.
    Displayed {
        /// Version of the page (`None` when unversioned).
        version: Option<String>,
        /// Slug of the page.
        slug: String,
        /// Document resource path.
        path: String,
    },
    /// The slug matched nothing; the first page is displayed instead.
    FellBack {
        /// Slug that was requested.
        requested: Option<String>,
        /// Slug of the page displayed.
        slug: String,
        /// Document resource path.
        path: String,
    },
    /// The slug matched nothing; the hash was rewritten to the first page.
    ///
    /// The host delivers the rewritten hash as a new trigger.
    Rewrote {
        /// Hash written.
        hash: String,
    },
    /// The slug matched nothing; the browser was sent elsewhere.
    Redirected {
        /// Redirect target.
        url: String,
    },
    /// Nothing could be displayed (the catalog is empty or unavailable).
    NotFound {
        /// Slug that was requested.
        slug: Option<String>,
    },
    /// A newer trigger started before this one finished.
    Superseded,
    /// The version manifest is still loading.
    ///
    /// The hash is kept, and [`Router::start`] routes the latest deferred
    /// hash in place of its initial one.
    Deferred,
    /// The version manifest failed to load; the router no longer routes.
    Halted,
}

/// What the current trigger resolved its slug to.
enum Target {
    Page { slug: String, file: String },
    Missing {
        requested: Option<String>,
        first: Option<(String, String)>,
    },
}

#[derive(Default)]
struct Session {
    manifest: Option<VersionManifest>,
    catalog: Catalog,
    catalog_loaded: bool,
    nav: NavigationState,
    sidebar: Sidebar,
    selector: VersionSelector,
    pending_hash: Option<String>,
    halted: bool,
}

struct Inner {
    services: Services,
    options: RouterOptions,
    loader: CatalogLoader,
    content: ContentLoader,
    session: RefCell<Session>,
    menu: Cell<MobileMenu>,
    triggers: Cell<u64>,
}

/// The documentation router.
///
/// Cheap to clone; clones share state, so event handlers can each hold one.
#[derive(Clone)]
pub struct Router {
    inner: Rc<Inner>,
}

impl Router {
    /// Create a router over `services`.
    ///
    /// Nothing is fetched until [`start`](Self::start).
    #[must_use]
    pub fn new(services: Services, options: RouterOptions) -> Self {
        let loader = CatalogLoader::new(Rc::clone(&services.fetcher), options.layout.clone());
        let content = ContentLoader::new(services.clone(), options.fade_delay);
        let menu = MobileMenu::new(options.menu_breakpoint);
        Self {
            inner: Rc::new(Inner {
                services,
                options,
                loader,
                content,
                session: RefCell::new(Session::default()),
                menu: Cell::new(menu),
                triggers: Cell::new(0),
            }),
        }
    }

    /// Router configuration.
    #[must_use]
    pub fn options(&self) -> &RouterOptions {
        &self.inner.options
    }

    /// Load the version manifest (versioned sites) and route `initial_hash`.
    ///
    /// Triggers that arrive while the manifest loads are deferred; the last
    /// of them replaces `initial_hash`.
    ///
    /// # Errors
    ///
    /// Returns the manifest error if the manifest cannot be loaded. The
    /// content region then shows the error and the router stays halted.
    pub async fn start(&self, initial_hash: &str) -> Result<RouteOutcome, Error> {
        if self.inner.options.layout.is_versioned() {
            match self.inner.loader.load_versions().await {
                Ok(manifest) => {
                    self.inner.session.borrow_mut().manifest = Some(manifest);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error loading versions");
                    let mut session = self.inner.session.borrow_mut();
                    session.halted = true;
                    session.pending_hash = None;
                    drop(session);
                    self.show_message(&error_html(&e.to_string()));
                    return Err(e);
                }
            }
        }
        let pending = self.inner.session.borrow_mut().pending_hash.take();
        let hash = pending.as_deref().unwrap_or(initial_hash);
        Ok(self.handle_route(hash).await)
    }

    /// Route a hash.
    ///
    /// Call on every hash change. Resolution never fails: missing pages and
    /// catalogs are reported through the outcome and inline messages.
    pub async fn handle_route(&self, hash: &str) -> RouteOutcome {
        let inner = &self.inner;
        let trigger = inner.triggers.get() + 1;
        inner.triggers.set(trigger);

        let versioned = inner.options.layout.is_versioned();
        let manifest = {
            let mut session = inner.session.borrow_mut();
            if session.halted {
                tracing::debug!(hash, "Router halted, ignoring route");
                return RouteOutcome::Halted;
            }
            if versioned && session.manifest.is_none() {
                tracing::debug!(hash, "Version manifest not loaded yet, deferring route");
                session.pending_hash = Some(hash.to_owned());
                return RouteOutcome::Deferred;
            }
            session.manifest.clone()
        };

        let route = Route::parse(hash, versioned);
        let version = manifest
            .as_ref()
            .map(|m| m.resolve(route.version.as_deref()).to_owned());
        if let (Some(requested), Some(resolved)) = (&route.version, &version)
            && requested != resolved
        {
            tracing::debug!(requested = %requested, resolved = %resolved, "Unknown version, using latest");
        }

        let needs_catalog = {
            let session = inner.session.borrow();
            !session.catalog_loaded || session.nav.current_version != version
        };
        if needs_catalog {
            let loaded = inner.loader.load_catalog(version.as_deref()).await;
            if inner.triggers.get() != trigger {
                tracing::debug!(hash, "Route superseded while loading catalog");
                return RouteOutcome::Superseded;
            }

            match loaded {
                Ok(catalog) => self.install_catalog(catalog, version.clone(), manifest.as_ref()),
                Err(e) => {
                    tracing::warn!(error = %e, "Error loading catalog");
                    self.install_catalog(Catalog::default(), version.clone(), manifest.as_ref());
                    inner.services.shell.show_catalog_error(&e.to_string());
                    // Retry on the next trigger.
                    inner.session.borrow_mut().catalog_loaded = false;
                }
            }
        }

        let target = {
            let session = inner.session.borrow();
            let catalog = &session.catalog;
            let wanted = route
                .slug
                .clone()
                .or_else(|| catalog.first().map(|p| p.slug()));
            let found = wanted
                .as_deref()
                .and_then(|slug| catalog.find(slug))
                .map(|page| page.file.clone());
            match (wanted, found) {
                (Some(slug), Some(file)) => Target::Page { slug, file },
                (requested, _) => Target::Missing {
                    requested,
                    first: catalog.first().map(|p| (p.slug(), p.file.clone())),
                },
            }
        };

        match target {
            Target::Page { slug, file } => {
                let path = self.show_page(version.as_deref(), &slug, &file);
                tracing::debug!(hash, slug = %slug, path = %path, "Route resolved");
                RouteOutcome::Displayed {
                    version,
                    slug,
                    path,
                }
            }
            Target::Missing { requested, first } => {
                self.page_not_found(version, requested, first)
            }
        }
    }

    /// Ask the host to switch to `version`, keeping the active page's slug.
    ///
    /// Returns `false` (and does nothing) for versions the manifest does not
    /// list. The switch itself happens on the resulting hash change.
    pub fn select_version(&self, version: &str) -> bool {
        let hash = {
            let session = self.inner.session.borrow();
            match &session.manifest {
                Some(manifest) if manifest.contains(version) => {
                    Route::versioned(version, session.nav.active_slug.clone()).to_hash()
                }
                _ => {
                    tracing::warn!(version, "Ignoring unknown version");
                    return false;
                }
            }
        };
        self.inner.services.shell.set_hash(&hash);
        true
    }

    /// Menu control pressed.
    pub fn toggle_menu(&self) {
        self.update_menu(|menu| {
            menu.toggle();
        });
    }

    /// A sidebar link was activated at `viewport_width`.
    pub fn link_activated(&self, viewport_width: u32) {
        self.update_menu(|menu| menu.link_activated(viewport_width));
    }

    /// The viewport was resized to `viewport_width`.
    pub fn viewport_resized(&self, viewport_width: u32) {
        self.update_menu(|menu| menu.viewport_resized(viewport_width));
    }

    /// A click landed outside the sidebar and the menu control.
    pub fn clicked_outside(&self) {
        self.update_menu(MobileMenu::clicked_outside);
    }

    /// Whether the sidebar drawer is open.
    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.inner.menu.get().is_open()
    }

    /// Current navigation state.
    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        self.inner.session.borrow().nav.clone()
    }

    /// Current sidebar.
    #[must_use]
    pub fn sidebar(&self) -> Sidebar {
        self.inner.session.borrow().sidebar.clone()
    }

    /// Current version selector.
    #[must_use]
    pub fn version_selector(&self) -> VersionSelector {
        self.inner.session.borrow().selector.clone()
    }

    /// Loaded catalog (empty before the first route).
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.inner.session.borrow().catalog.clone()
    }

    /// Loaded version manifest.
    #[must_use]
    pub fn manifest(&self) -> Option<VersionManifest> {
        self.inner.session.borrow().manifest.clone()
    }

    /// Whether initialization failed.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.inner.session.borrow().halted
    }

    fn install_catalog(
        &self,
        catalog: Catalog,
        version: Option<String>,
        manifest: Option<&VersionManifest>,
    ) {
        let (sidebar, selector) = {
            let mut session = self.inner.session.borrow_mut();
            session.sidebar = Sidebar::build(&catalog, version.as_deref());
            session.selector = match (manifest, version.as_deref()) {
                (Some(manifest), Some(version)) => VersionSelector::build(manifest, version),
                _ => VersionSelector::default(),
            };
            session.catalog = catalog;
            session.catalog_loaded = true;
            session.nav.current_version = version;
            session.nav.active_slug = None;
            (session.sidebar.clone(), session.selector.clone())
        };

        let shell = &self.inner.services.shell;
        shell.render_sidebar(&sidebar);
        if manifest.is_some() {
            shell.render_version_selector(&selector);
        }
    }

    /// Mark `slug` active and start loading its document.
    fn show_page(&self, version: Option<&str>, slug: &str, file: &str) -> String {
        let path = self.inner.options.layout.document_path(version, file);
        self.set_active(Some(slug));
        let task = self.inner.content.display(path.clone());
        self.inner.services.spawner.spawn(task);
        path
    }

    fn page_not_found(
        &self,
        version: Option<String>,
        requested: Option<String>,
        first: Option<(String, String)>,
    ) -> RouteOutcome {
        if let Some(slug) = &requested {
            let e = Error::PageNotFound { slug: slug.clone() };
            tracing::warn!(error = %e, "Unknown page");
        }

        let Some((first_slug, first_file)) = first else {
            self.set_active(None);
            self.show_message(&not_found_html(requested.as_deref()));
            return RouteOutcome::NotFound { slug: requested };
        };

        match &self.inner.options.not_found {
            NotFoundPolicy::Fallback => {
                let path = self.show_page(version.as_deref(), &first_slug, &first_file);
                RouteOutcome::FellBack {
                    requested,
                    slug: first_slug,
                    path,
                }
            }
            NotFoundPolicy::Redirect { url } => {
                self.set_active(None);
                self.inner.services.shell.redirect(url);
                RouteOutcome::Redirected { url: url.clone() }
            }
            NotFoundPolicy::Rewrite => {
                let route = match version {
                    Some(version) => Route::versioned(version, Some(first_slug)),
                    None => Route::page(first_slug),
                };
                let hash = route.to_hash();
                self.set_active(None);
                self.inner.services.shell.set_hash(&hash);
                RouteOutcome::Rewrote { hash }
            }
        }
    }

    fn set_active(&self, slug: Option<&str>) {
        let sidebar = {
            let mut session = self.inner.session.borrow_mut();
            session.nav.active_slug = slug.map(str::to_owned);
            session.sidebar.set_active(slug);
            session.sidebar.clone()
        };
        self.inner.services.shell.render_sidebar(&sidebar);
    }

    /// Write a message into the content region, cancelling any pending load.
    fn show_message(&self, html: &str) {
        let surface = &self.inner.services.surface;
        self.inner.content.invalidate();
        surface.set_html(html);
        surface.remove_class(FADE_OUT_CLASS);
        surface.remove_class(FADE_IN_CLASS);
    }

    fn update_menu(&self, f: impl FnOnce(&mut MobileMenu)) {
        let mut menu = self.inner.menu.get();
        f(&mut menu);
        self.inner.menu.set(menu);
        self.inner.services.shell.set_menu_open(menu.is_open());
    }
}
