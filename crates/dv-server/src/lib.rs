//! Static HTTP server for dv documentation sites.
//!
//! Serves a built site directory (document shell, version manifest,
//! catalogs, Markdown documents and the viewer bundle) with security headers
//! and request tracing. All routing happens client-side in the URL fragment,
//! so the server only ever needs to answer with files.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use dv_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 7878,
//!         root: PathBuf::from("site"),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use dv_config::SiteRoot;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site directory to serve.
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
            root: PathBuf::from("site"),
        }
    }
}

impl ServerConfig {
    /// Listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Address`] if host and port do not parse.
    pub fn address(&self) -> Result<SocketAddr, ServerError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|source| ServerError::Address { address, source })
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the root is missing, the address is invalid, or the
/// listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if !config.root.is_dir() {
        return Err(ServerError::MissingRoot(config.root));
    }
    let addr = config.address()?;

    let state = Arc::new(AppState::new(config.root));
    let app = app::create_router(&state);

    tracing::info!(address = %addr, root = %state.root.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from dv config.
///
/// # Errors
///
/// Returns [`ServerError::RemoteRoot`] if the site root is a URL.
pub fn server_config_from_dv_config(config: &dv_config::Config) -> Result<ServerConfig, ServerError> {
    let root = match &config.site_resolved.root {
        SiteRoot::Dir(dir) => dir.clone(),
        SiteRoot::Url(url) => return Err(ServerError::RemoteRoot(url.clone())),
    };

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root,
    })
}
