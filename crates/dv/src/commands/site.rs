//! Site access shared by commands.

use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use dv_config::{CliSettings, Config, NotFoundMode, SiteRoot};
use dv_fetch::{Fetcher, FsFetcher, HttpFetcher};
use dv_router::{NotFoundPolicy, RouterOptions, SiteLayout};
use tokio::task::LocalSet;

use crate::error::CliError;

/// Arguments locating a site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root directory or http(s) base URL (overrides config).
    #[arg(short, long, env = "DV_SITE_ROOT")]
    root: Option<String>,
}

impl SiteArgs {
    /// Load configuration with the root override applied.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            root: self.root.clone(),
            ..CliSettings::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Fetcher reading from the site root.
pub(crate) fn fetcher(root: &SiteRoot) -> Rc<dyn Fetcher> {
    match root {
        SiteRoot::Dir(dir) => Rc::new(FsFetcher::new(dir.clone())),
        SiteRoot::Url(url) => Rc::new(HttpFetcher::new(url)),
    }
}

/// Router options described by the configuration.
pub(crate) fn router_options(config: &Config) -> RouterOptions {
    let site = &config.site_resolved;
    let layout = match &site.versions_manifest {
        Some(manifest) => SiteLayout::Versioned {
            manifest: manifest.clone(),
            catalog: site.catalog.clone(),
            docs_root: site.docs_root.clone(),
        },
        None => SiteLayout::Unversioned {
            catalog: site.catalog.clone(),
            docs_root: site.docs_root.clone(),
        },
    };
    let not_found = match site.not_found {
        NotFoundMode::Rewrite => NotFoundPolicy::Rewrite,
        NotFoundMode::Fallback => NotFoundPolicy::Fallback,
        NotFoundMode::Redirect => NotFoundPolicy::Redirect {
            url: site.not_found_url.clone().unwrap_or_default(),
        },
    };

    RouterOptions {
        layout,
        not_found,
        fade_delay: Duration::from_millis(config.transition.fade_ms),
        menu_breakpoint: config.menu.breakpoint,
    }
}

/// Run `future` on a single-threaded runtime with a `LocalSet`.
///
/// The router's host seams are `!Send`, so its tasks need local spawning.
pub(crate) fn run_local<F: Future>(future: F) -> Result<F::Output, CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(LocalSet::new().block_on(&rt, future))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_router_options_defaults() {
        let config = Config::default();

        let options = router_options(&config);

        assert_eq!(options.layout, SiteLayout::versioned());
        assert_eq!(options.not_found, NotFoundPolicy::Rewrite);
        assert_eq!(options.fade_delay, Duration::from_millis(250));
        assert_eq!(options.menu_breakpoint, 768);
    }

    #[test]
    fn test_router_options_unversioned_redirect() {
        let mut config = Config::default();
        config.site_resolved.versions_manifest = None;
        config.site_resolved.catalog = "docs/pages.json".to_owned();
        config.site_resolved.not_found = NotFoundMode::Redirect;
        config.site_resolved.not_found_url = Some("404.html".to_owned());
        config.transition.fade_ms = 0;

        let options = router_options(&config);

        assert_eq!(options.layout, SiteLayout::unversioned());
        assert_eq!(
            options.not_found,
            NotFoundPolicy::Redirect {
                url: "404.html".to_owned()
            }
        );
        assert_eq!(options.fade_delay, Duration::ZERO);
    }

    #[test]
    fn test_run_local_spawns_local_tasks() {
        let value = run_local(async {
            let handle = tokio::task::spawn_local(async { 7 });
            handle.await.unwrap()
        })
        .unwrap();

        assert_eq!(value, 7);
    }
}
