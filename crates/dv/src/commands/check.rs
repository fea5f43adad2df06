//! `dv check` command implementation.

use std::rc::Rc;

use clap::Args;
use dv_fetch::Fetcher;
use dv_router::{CatalogLoader, RouterOptions};

use super::site::{self, SiteArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or any catalog fails to load, or if
    /// any listed document is missing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.site.load()?;
        let fetcher = site::fetcher(&config.site_resolved.root);
        let options = site::router_options(&config);
        tracing::debug!(root = ?config.site_resolved.root, "Checking site");

        let problems = site::run_local(check_site(fetcher, options))??;
        if problems > 0 {
            return Err(CliError::Validation(format!("{problems} problem(s) found")));
        }
        Ok(())
    }
}

/// Walk every catalog of the site, returning the number of problems.
async fn check_site(fetcher: Rc<dyn Fetcher>, options: RouterOptions) -> Result<usize, CliError> {
    let output = Output::new();
    let layout = options.layout;
    let loader = CatalogLoader::new(Rc::clone(&fetcher), layout.clone());

    let versions: Vec<Option<String>> = if layout.is_versioned() {
        let manifest = loader.load_versions().await?;
        output.highlight(&format!(
            "{} version(s), latest {}",
            manifest.versions().len(),
            manifest.latest()
        ));
        manifest.versions().iter().cloned().map(Some).collect()
    } else {
        vec![None]
    };

    let mut problems = 0;
    for version in versions {
        let label = version.as_deref().unwrap_or("site");
        let catalog = match loader.load_catalog(version.as_deref()).await {
            Ok(catalog) => catalog,
            Err(e) => {
                output.error(&format!("{label}: {e}"));
                problems += 1;
                continue;
            }
        };

        for collision in catalog.collisions() {
            output.warning(&format!(
                "{label}: \"{}\" is unreachable, slug \"{}\" belongs to \"{}\"",
                collision.shadowed, collision.slug, collision.winner
            ));
        }

        let mut missing = 0;
        for page in catalog.pages() {
            let path = layout.document_path(version.as_deref(), &page.file);
            if let Err(e) = fetcher.fetch(&path).await {
                output.error(&format!("{label}: {}: {e}", page.title));
                missing += 1;
            }
        }
        problems += missing;

        if missing == 0 {
            output.success(&format!("{label}: {} page(s) OK", catalog.len()));
        }
    }

    Ok(problems)
}
