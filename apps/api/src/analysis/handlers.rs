//! Axum route handlers for the resume analyzer.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::analysis::pipeline::run_submission;
use crate::analysis::sessions::{AnalyzerSession, SessionSnapshot};
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::UploadForm;

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<AnalyzerSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Analyzer session {id} not found")))
}

/// POST /api/v1/analyzer/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let session = state.sessions.create().await;
    let open_sessions = state.sessions.len().await;
    info!(
        session_id = %session.id,
        open_sessions,
        "Analyzer session created"
    );
    (StatusCode::CREATED, Json(session.snapshot().await))
}

/// GET /api/v1/analyzer/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.snapshot().await))
}

/// POST /api/v1/analyzer/sessions/:id/submit
///
/// Multipart `file` + `job_description`. Responds once the analysis has
/// finished; a second submit while one is running gets 409.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;

    let mut form = UploadForm::read(multipart).await?;
    let job_description = form.require_text("job_description")?;
    let document = form.take_document("file")?;

    // Spawned so a client disconnect cannot abandon the session in `Loading`.
    let submission = tokio::spawn(run_submission(
        session,
        Arc::clone(&state.analyzer),
        document,
        job_description,
    ));
    let snapshot = submission.await.context("analysis task failed")??;

    Ok(Json(snapshot))
}

/// POST /api/v1/analyzer/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    session.reset().await?;
    Ok(Json(session.snapshot().await))
}

/// DELETE /api/v1/analyzer/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Analyzer session {id} not found")))
    }
}
