//! `dv serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_server::{run_server, server_config_from_dv_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory to serve (overrides config).
    #[arg(short, long, env = "DV_SITE_ROOT")]
    root: Option<String>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (log every request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            root: self.root,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_dv_config(&config)?;

        output.info(&format!(
            "Starting server on {}:{}",
            server_config.host, server_config.port
        ));
        output.info(&format!("Site root: {}", server_config.root.display()));
        if let Some(manifest) = &config.site_resolved.versions_manifest {
            output.info(&format!("Version manifest: {manifest}"));
        } else {
            output.info("Versions: disabled (unversioned site)");
        }

        run_server(server_config).await?;

        Ok(())
    }
}
