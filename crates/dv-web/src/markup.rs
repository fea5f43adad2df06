//! HTML fragments for the navigation chrome.

use dv_renderer::escape_html;
use dv_router::{Sidebar, VersionSelector};

/// Class marking the current sidebar link.
pub const ACTIVE_CLASS: &str = "active";

/// Class on the sidebar element while the mobile drawer is open.
pub const MENU_OPEN_CLASS: &str = "open";

/// Sidebar list: one `<li><a>` per catalog page.
///
/// Links carry the page's hash in `href` and its document in `data-file`.
pub fn sidebar_html(sidebar: &Sidebar) -> String {
    let mut html = String::from("<ul>");
    for link in sidebar.links() {
        let class = if link.active {
            format!(r#" class="{ACTIVE_CLASS}""#)
        } else {
            String::new()
        };
        html.push_str(&format!(
            r#"<li><a href="{}" data-file="{}"{class}>{}</a></li>"#,
            escape_html(&link.href),
            escape_html(&link.file),
            escape_html(&link.title),
        ));
    }
    html.push_str("</ul>");
    html
}

/// `<option>` elements for the version `<select>`.
pub fn version_options_html(selector: &VersionSelector) -> String {
    selector
        .options()
        .iter()
        .map(|option| {
            let selected = if option.selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(&option.version),
                escape_html(&option.label),
            )
        })
        .collect()
}

/// Inline notice shown in the sidebar when a catalog cannot be loaded.
pub fn catalog_error_html(message: &str) -> String {
    format!(
        r#"<p class="nav-error">Error loading navigation: {}</p>"#,
        escape_html(message)
    )
}
