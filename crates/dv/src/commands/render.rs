//! `dv render` command implementation.

use clap::Args;
use dv_router::{
    HeadlessSession, NavLink, NavigationState, RouteOutcome, Sidebar, VersionSelector,
};
use serde::Serialize;

use super::site::{self, SiteArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// URL hashes to visit in order; the first is the initial location.
    hashes: Vec<String>,

    #[command(flatten)]
    site: SiteArgs,

    /// Print a JSON summary of the final state instead of the page HTML.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Final state of a headless session.
#[derive(Serialize)]
struct RenderReport {
    outcomes: Vec<RouteOutcome>,
    navigation: NavigationState,
    active: Option<NavLink>,
    sidebar: Sidebar,
    versions: VersionSelector,
    content: String,
    classes: Vec<String>,
    catalog_errors: Vec<String>,
    redirects: Vec<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the version manifest
    /// cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load()?;
        let fetcher = site::fetcher(&config.site_resolved.root);
        let options = site::router_options(&config);
        tracing::debug!(root = ?config.site_resolved.root, hashes = self.hashes.len(), "Rendering");

        let report = site::run_local(async {
            let session = HeadlessSession::new(fetcher, options);
            let mut hashes = self.hashes.iter().map(String::as_str);

            let mut outcomes = session.open(hashes.next().unwrap_or_default()).await?;
            for hash in hashes {
                outcomes.extend(session.navigate(hash).await);
            }
            session.host().surface.finish_animation();

            Ok::<_, CliError>(report(&session, outcomes))
        })??;

        if self.json {
            output.result(&serde_json::to_string_pretty(&report)?)?;
        } else {
            for error in &report.catalog_errors {
                output.warning(error);
            }
            for url in &report.redirects {
                output.warning(&format!("Redirected to {url}"));
            }
            output.result(&report.content)?;
        }
        Ok(())
    }
}

fn report(session: &HeadlessSession, outcomes: Vec<RouteOutcome>) -> RenderReport {
    let router = session.router();
    let host = session.host();
    let sidebar = router.sidebar();
    RenderReport {
        outcomes,
        navigation: router.navigation(),
        active: sidebar.active().cloned(),
        sidebar,
        versions: router.version_selector(),
        content: host.surface.html(),
        classes: host.surface.classes(),
        catalog_errors: host.shell.catalog_errors(),
        redirects: host.shell.redirects(),
    }
}
