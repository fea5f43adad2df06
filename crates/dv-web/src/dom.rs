//! DOM-backed content surface and page shell.

use dv_renderer::{CodeBlock, Highlighter};
use dv_router::{ContentSurface, Shell, Sidebar, VersionSelector};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Element, Event};

use crate::markup::{MENU_OPEN_CLASS, catalog_error_html, sidebar_html, version_options_html};

/// The `#content` element.
pub struct WebSurface {
    element: Element,
}

impl WebSurface {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl ContentSurface for WebSurface {
    fn add_class(&self, class: &str) {
        if let Err(e) = self.element.class_list().add_1(class) {
            tracing::warn!(class, error = ?e, "Failed to add class");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.element.class_list().remove_1(class) {
            tracing::warn!(class, error = ?e, "Failed to remove class");
        }
    }

    fn set_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn scroll_to_top(&self) {
        self.element.set_scroll_top(0);
    }

    fn highlight_code_blocks(&self, highlighter: &dyn Highlighter) -> usize {
        let nodes = match self.element.query_selector_all("pre code") {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to query code blocks");
                return 0;
            }
        };

        let mut count = 0;
        for index in 0..nodes.length() {
            let Some(code) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let classes = code
                .class_name()
                .split_whitespace()
                .map(str::to_owned)
                .collect();
            let mut block = CodeBlock::new(code.text_content().unwrap_or_default(), classes);
            highlighter.highlight(&mut block);
            code.set_class_name(&block.classes.join(" "));
            code.set_inner_html(&block.html);
            count += 1;
        }
        count
    }

    fn on_animation_end_once(&self, callback: Box<dyn FnOnce()>) {
        let listener = Closure::once_into_js(move |_: Event| callback());
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if let Err(e) = self
            .element
            .add_event_listener_with_callback_and_add_event_listener_options(
                "animationend",
                listener.unchecked_ref(),
                &options,
            )
        {
            tracing::warn!(error = ?e, "Failed to subscribe to animationend");
        }
    }
}

/// Sidebar, version selector and location of the hosting page.
pub struct WebShell {
    sidebar: Element,
    selector: Option<Element>,
}

impl WebShell {
    pub fn new(sidebar: Element, selector: Option<Element>) -> Self {
        Self { sidebar, selector }
    }
}

impl Shell for WebShell {
    fn render_sidebar(&self, sidebar: &Sidebar) {
        self.sidebar.set_inner_html(&sidebar_html(sidebar));
    }

    fn render_version_selector(&self, selector: &VersionSelector) {
        if let Some(element) = &self.selector {
            element.set_inner_html(&version_options_html(selector));
        }
    }

    fn set_hash(&self, hash: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_hash(hash) {
            tracing::warn!(hash, error = ?e, "Failed to set location hash");
        }
    }

    fn redirect(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().assign(url) {
            tracing::warn!(url, error = ?e, "Failed to redirect");
        }
    }

    fn show_catalog_error(&self, message: &str) {
        if let Err(e) = self
            .sidebar
            .insert_adjacent_html("beforeend", &catalog_error_html(message))
        {
            tracing::warn!(error = ?e, "Failed to show catalog error");
        }
    }

    fn set_menu_open(&self, open: bool) {
        if let Err(e) = self
            .sidebar
            .class_list()
            .toggle_with_force(MENU_OPEN_CLASS, open)
        {
            tracing::warn!(error = ?e, "Failed to toggle menu");
        }
    }
}
