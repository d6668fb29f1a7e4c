//! Single-page-app fallback for paths the static file server does not know.

use axum::{
    extract::State,
    http::{Method, Uri},
    response::Html,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Last path segment ends in an extension of two or more alphanumerics.
static FILE_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[A-Za-z0-9]{2,}$").expect("valid regex"));

/// True for client-side routes: not under `/api/` and not shaped like a file.
pub fn is_spa_route(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("/api/") && !FILE_LIKE.is_match(path)
}

/// Serves `index.html` for client-side routes; everything else is a JSON 404.
pub async fn spa_fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let path = uri.path();
    if !(method == Method::GET || method == Method::HEAD) || !is_spa_route(path) {
        return Err(AppError::NotFound(format!("No route for {method} {path}")));
    }

    let index = state.config.static_dir.join("index.html");
    let html = tokio::fs::read_to_string(&index).await.map_err(|e| {
        warn!("UI entry page {} unavailable: {e}", index.display());
        AppError::NotFound("UI build not found".to_string())
    })?;

    Ok(Html(html))
}
