//! Router construction.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get_service, post};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::bootstrap::AxumContext;
use crate::error::HttpError;
use crate::handlers;
use crate::state::AppState;

/// Upper bound on request bodies; voice recordings are the largest.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// API routes without the `/api` prefix (nested by the caller).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/stt", post(handlers::speech::speech_to_text))
        .route("/tts", post(handlers::speech::text_to_speech))
}

/// Create the main Axum router.
///
/// With `static_dir`, `GET /` serves its `index.html` and `/static/*` serves
/// its files. Every other unknown path answers with a JSON 404.
pub fn create_router(ctx: AxumContext, static_dir: Option<&Path>) -> Router {
    let state: AppState = Arc::new(ctx);

    let mut router = Router::new().nest("/api", api_routes().with_state(state));

    if let Some(dir) = static_dir {
        router = router
            .route("/", get_service(ServeFile::new(dir.join("index.html"))))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> HttpError {
    HttpError::NotFound
}
