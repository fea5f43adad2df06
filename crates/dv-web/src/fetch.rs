//! `window.fetch` backend.

use async_trait::async_trait;
use dv_fetch::{FetchError, FetchErrorKind, Fetcher};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

const BACKEND: &str = "Web";

/// Exception raised by a browser API.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct JsError(String);

impl From<JsValue> for JsError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self(message)
    }
}

/// Fetcher resolving paths against the page URL through `window.fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFetcher;

impl WebFetcher {
    fn failure(kind: FetchErrorKind, path: &str, value: JsValue) -> FetchError {
        FetchError::new(kind)
            .with_path(path)
            .with_backend(BACKEND)
            .with_source(JsError::from(value))
    }
}

#[async_trait(?Send)]
impl Fetcher for WebFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let window = web_sys::window().ok_or_else(|| {
            Self::failure(FetchErrorKind::Other, path, JsValue::from_str("no window"))
        })?;

        let response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|e| Self::failure(FetchErrorKind::Network, path, e))?;
        let response: Response = response
            .dyn_into()
            .map_err(|e| Self::failure(FetchErrorKind::Other, path, e))?;

        if !response.ok() {
            return Err(FetchError::status(response.status(), path).with_backend(BACKEND));
        }

        let text = response
            .text()
            .map_err(|e| Self::failure(FetchErrorKind::Other, path, e))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|e| Self::failure(FetchErrorKind::Network, path, e))?;

        text.as_string().ok_or_else(|| {
            Self::failure(
                FetchErrorKind::Other,
                path,
                JsValue::from_str("response body is not text"),
            )
        })
    }
}
