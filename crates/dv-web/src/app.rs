//! Entry point: find the page regions, start the router and wire events.

use std::rc::Rc;

use dv_renderer::MarkdownRenderer;
use dv_router::{Router, Services};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlSelectElement, Node};

use crate::dom::{WebShell, WebSurface};
use crate::fetch::WebFetcher;
use crate::highlight::HljsHighlighter;
use crate::options::router_options;
use crate::runtime::{WebSpawner, WebTimer};

const CONTENT_ID: &str = "content";
const SIDEBAR_ID: &str = "sidebar";
const VERSION_SELECTOR_ID: &str = "version-selector";
const MENU_TOGGLE_ID: &str = "menu-toggle";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let content = required(&document, CONTENT_ID)?;
    let sidebar = required(&document, SIDEBAR_ID)?;
    let selector = document.get_element_by_id(VERSION_SELECTOR_ID);
    let menu_toggle = document.get_element_by_id(MENU_TOGGLE_ID);

    let options = router_options(selector.is_some(), |name| {
        content.get_attribute(&format!("data-{name}"))
    });
    let services = Services {
        fetcher: Rc::new(WebFetcher),
        timer: Rc::new(WebTimer),
        spawner: Rc::new(WebSpawner),
        surface: Rc::new(WebSurface::new(content)),
        shell: Rc::new(WebShell::new(sidebar.clone(), selector.clone())),
        renderer: Rc::new(MarkdownRenderer::new()),
        highlighter: Rc::new(HljsHighlighter),
    };
    let router = Router::new(services, options);

    let initial = router.clone();
    let hash = window.location().hash()?;
    spawn_local(async move {
        if let Err(e) = initial.start(&hash).await {
            web_sys::console::error_1(&e.to_string().into());
        }
    });

    listen(&window, "hashchange", {
        let router = router.clone();
        move |_| {
            let router = router.clone();
            spawn_local(async move {
                router.handle_route(&current_hash()).await;
            });
        }
    })?;

    listen(&window, "resize", {
        let router = router.clone();
        move |_| router.viewport_resized(viewport_width())
    })?;

    listen(&sidebar, "click", {
        let router = router.clone();
        move |event| {
            let on_link = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("a").ok().flatten())
                .is_some();
            if on_link {
                router.link_activated(viewport_width());
            }
        }
    })?;

    if let Some(toggle) = &menu_toggle {
        listen(toggle, "click", {
            let router = router.clone();
            move |_| router.toggle_menu()
        })?;
    }

    listen(&document, "click", {
        let router = router.clone();
        let sidebar: Node = sidebar.clone().into();
        let toggle: Option<Node> = menu_toggle.map(Into::into);
        move |event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside = |region: &Node| region.contains(target.as_ref());
            if !inside(&sidebar) && !toggle.as_ref().is_some_and(inside) {
                router.clicked_outside();
            }
        }
    })?;

    if let Some(selector) = selector {
        listen(&selector, "change", move |event| {
            let value = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                .map(|select| select.value());
            if let Some(version) = value {
                router.select_version(&version);
            }
        })?;
    }

    Ok(())
}

fn required(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))
}

/// Register `handler` for the page's lifetime.
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Viewport width in CSS pixels; unknown widths count as wide.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn viewport_width() -> u32 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|width| width.as_f64())
        .map_or(u32::MAX, |width| width.clamp(0.0, f64::from(u32::MAX)) as u32)
}
