pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analyzer;
use crate::intake::handlers as intake;
use crate::speech::handlers as speech;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Intake
        .route("/api/v1/intake/normalize", post(intake::handle_normalize))
        // Resume analyzer
        .route(
            "/api/v1/analyzer/sessions",
            post(analyzer::handle_create_session),
        )
        .route(
            "/api/v1/analyzer/sessions/:id",
            get(analyzer::handle_get_session).delete(analyzer::handle_delete_session),
        )
        .route(
            "/api/v1/analyzer/sessions/:id/submit",
            post(analyzer::handle_submit),
        )
        .route(
            "/api/v1/analyzer/sessions/:id/reset",
            post(analyzer::handle_reset),
        )
        // Speech coaching
        .route("/api/v1/speech/analyze", post(speech::handle_speech_analyze))
        .layer(upload_limit)
        .with_state(state)
}
