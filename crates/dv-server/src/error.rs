//! Server error types.

use std::path::PathBuf;

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured site root is a URL; only directories can be served.
    #[error("Cannot serve a remote site root: {0}")]
    RemoteRoot(String),
    /// The site root directory does not exist.
    #[error("Site root not found: {}", .0.display())]
    MissingRoot(PathBuf),
    /// Host and port do not form a socket address.
    #[error("Invalid listen address {address}: {source}")]
    Address {
        /// The rejected `host:port`.
        address: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
