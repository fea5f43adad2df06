//! Resource fetching for the dv documentation viewer.
//!
//! This crate provides a [`Fetcher`] trait that abstracts the HTTP-style
//! retrieval of manifests and document bodies from wherever the site is
//! hosted. This enables:
//!
//! - **Unit testing** of routing without a network or filesystem
//! - **Backend flexibility** (local site directory, remote HTTP host, browser `fetch`)
//! - **Uniform failures**: every backend reports a missing resource or a
//!   non-success status as a [`FetchError`]
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Fetcher`] trait with a single async `fetch()` method
//! - [`FsFetcher`] for a site directory on disk (native targets)
//! - [`HttpFetcher`] for a site served over HTTP (native targets)
//! - [`MockFetcher`] for testing (behind `mock` feature flag)
//!
//! The browser backend lives in `dv-web`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use dv_fetch::{Fetcher, FsFetcher};
//!
//! let fetcher = FsFetcher::new(PathBuf::from("site"));
//! let body = fetcher.fetch("docs/v2/intro.md").await?;
//! ```

mod fetcher;
#[cfg(not(target_arch = "wasm32"))]
mod fs;
#[cfg(not(target_arch = "wasm32"))]
mod http;
#[cfg(all(feature = "mock", not(target_arch = "wasm32")))]
mod mock;

pub use fetcher::{FetchError, FetchErrorKind, Fetcher};
#[cfg(not(target_arch = "wasm32"))]
pub use fs::FsFetcher;
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpFetcher;
#[cfg(all(feature = "mock", not(target_arch = "wasm32")))]
pub use mock::MockFetcher;
