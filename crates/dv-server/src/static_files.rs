//! Static file serving.
//!
//! Serves the site directory as-is. Requests for paths without a file
//! extension get the document shell: the viewer routes in the URL fragment,
//! so any page URL a user pastes must still boot it. Missing files with an
//! extension stay 404 so the viewer can report them.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::handler::Handler;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Create router for static file serving with the document-shell fallback.
pub(crate) fn static_router(state: &Arc<AppState>) -> Router {
    let fallback = serve_shell.with_state(Arc::clone(state));
    let files = ServeDir::new(&state.root).fallback(fallback);
    Router::new().fallback_service(files)
}

/// Serve `index.html` for extension-less paths, 404 otherwise.
async fn serve_shell(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let path = req.uri().path();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    if file_name.contains('.') {
        tracing::debug!(path = %path, "Static file not found");
        return StatusCode::NOT_FOUND.into_response();
    }

    match ServeFile::new(&state.index).oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
