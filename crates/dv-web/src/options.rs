//! Router options read from the page markup.
//!
//! The content element may override the site layout through `data-*`
//! attributes. Without them the page's own shape decides: a version selector
//! means a versioned site with the conventional paths.
//!
//! | Attribute             | Meaning                                   |
//! |-----------------------|-------------------------------------------|
//! | `data-manifest`       | version manifest path (empty: unversioned) |
//! | `data-catalog`        | catalog path or `{version}` template      |
//! | `data-docs-root`      | document directory                        |
//! | `data-not-found`      | `rewrite`, `fallback` or `redirect`       |
//! | `data-not-found-url`  | redirect target                           |
//! | `data-fade-ms`        | fade-out delay in milliseconds            |
//! | `data-menu-breakpoint`| drawer breakpoint in pixels               |

use std::time::Duration;

use dv_router::{NotFoundPolicy, RouterOptions, SiteLayout};

/// Build router options from attribute lookups.
///
/// `attr` receives attribute names without the `data-` prefix. Malformed
/// values are logged and replaced by defaults.
pub fn router_options(has_version_selector: bool, attr: impl Fn(&str) -> Option<String>) -> RouterOptions {
    let defaults = RouterOptions::default();

    let versioned = match attr("manifest") {
        Some(manifest) => !manifest.trim().is_empty(),
        None => has_version_selector,
    };
    let mut layout = if versioned {
        SiteLayout::versioned()
    } else {
        SiteLayout::unversioned()
    };
    match &mut layout {
        SiteLayout::Versioned {
            manifest,
            catalog,
            docs_root,
        } => {
            override_with(manifest, attr("manifest"));
            override_with(catalog, attr("catalog"));
            override_with(docs_root, attr("docs-root"));
        }
        SiteLayout::Unversioned { catalog, docs_root } => {
            override_with(catalog, attr("catalog"));
            override_with(docs_root, attr("docs-root"));
        }
    }

    RouterOptions {
        layout,
        not_found: not_found_policy(attr("not-found").as_deref(), attr("not-found-url")),
        fade_delay: attr("fade-ms")
            .and_then(|ms| parse_number(&ms, "fade-ms"))
            .map_or(defaults.fade_delay, |ms| Duration::from_millis(u64::from(ms))),
        menu_breakpoint: attr("menu-breakpoint")
            .and_then(|px| parse_number(&px, "menu-breakpoint"))
            .unwrap_or(defaults.menu_breakpoint),
    }
}

fn override_with(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn not_found_policy(mode: Option<&str>, url: Option<String>) -> NotFoundPolicy {
    match (mode.map(str::trim), url) {
        (None | Some("rewrite"), _) => NotFoundPolicy::Rewrite,
        (Some("fallback"), _) => NotFoundPolicy::Fallback,
        (Some("redirect"), Some(url)) if !url.trim().is_empty() => NotFoundPolicy::Redirect { url },
        (Some("redirect"), _) => {
            tracing::warn!("data-not-found=\"redirect\" needs data-not-found-url; using rewrite");
            NotFoundPolicy::Rewrite
        }
        (Some(other), _) => {
            tracing::warn!(mode = other, "Unknown not-found mode; using rewrite");
            NotFoundPolicy::Rewrite
        }
    }
}

fn parse_number(value: &str, name: &str) -> Option<u32> {
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(attribute = name, value, error = %e, "Ignoring invalid attribute");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_follow_version_selector() {
        let options = router_options(true, lookup(&[]));
        assert_eq!(options.layout, SiteLayout::versioned());
        assert_eq!(options.not_found, NotFoundPolicy::Rewrite);
        assert_eq!(options.fade_delay, Duration::from_millis(250));

        let options = router_options(false, lookup(&[]));
        assert_eq!(options.layout, SiteLayout::unversioned());
    }

    #[test]
    fn test_empty_manifest_attribute_means_unversioned() {
        let options = router_options(true, lookup(&[("manifest", ""), ("catalog", "pages.json")]));

        assert_eq!(
            options.layout,
            SiteLayout::Unversioned {
                catalog: "pages.json".to_owned(),
                docs_root: "docs".to_owned(),
            }
        );
    }

    #[test]
    fn test_overrides() {
        let options = router_options(
            false,
            lookup(&[
                ("manifest", "meta/versions.json"),
                ("catalog", "meta/{version}.json"),
                ("docs-root", "content"),
                ("not-found", "redirect"),
                ("not-found-url", "/404.html"),
                ("fade-ms", "100"),
                ("menu-breakpoint", "600"),
            ]),
        );

        assert_eq!(
            options.layout,
            SiteLayout::Versioned {
                manifest: "meta/versions.json".to_owned(),
                catalog: "meta/{version}.json".to_owned(),
                docs_root: "content".to_owned(),
            }
        );
        assert_eq!(
            options.not_found,
            NotFoundPolicy::Redirect {
                url: "/404.html".to_owned()
            }
        );
        assert_eq!(options.fade_delay, Duration::from_millis(100));
        assert_eq!(options.menu_breakpoint, 600);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let options = router_options(
            true,
            lookup(&[("not-found", "redirect"), ("fade-ms", "soon"), ("menu-breakpoint", "-1")]),
        );

        assert_eq!(options.not_found, NotFoundPolicy::Rewrite);
        assert_eq!(options.fade_delay, Duration::from_millis(250));
        assert_eq!(options.menu_breakpoint, 768);
    }

    #[test]
    fn test_fallback_mode() {
        let options = router_options(true, lookup(&[("not-found", "fallback")]));

        assert_eq!(options.not_found, NotFoundPolicy::Fallback);
    }
}
