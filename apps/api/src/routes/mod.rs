pub mod health;
pub mod spa;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::preview::handlers::handle_generate_preview;
use crate::render::handlers::handle_download_pdf;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Built UI assets first; unknown paths fall through to the SPA entry page.
    let spa = spa::spa_fallback.with_state(state.clone());
    let static_files = ServeDir::new(&state.config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(spa);

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/generate-resume", post(handle_generate_preview))
        .route("/api/downloadBrandedPdf", post(handle_download_pdf))
        .layer(DefaultBodyLimit::max(state.config.json_body_limit))
        .fallback_service(static_files)
        .with_state(state)
}
