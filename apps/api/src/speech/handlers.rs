use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::speech::models::{SpeechAnalysisResult, SpeechSubmission};
use crate::state::AppState;
use crate::upload::UploadForm;

/// POST /api/v1/speech/analyze
///
/// Multipart `audio` (file), `score` (number) and optional `question`.
pub async fn handle_speech_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SpeechAnalysisResult>, AppError> {
    let mut form = UploadForm::read(multipart).await?;

    let score: f64 = form
        .require_text("score")?
        .parse()
        .map_err(|_| AppError::Validation("score must be a number".to_string()))?;
    let question = form.text("question").map(str::to_string);
    let audio = form.take_file("audio")?;

    let submission = SpeechSubmission::new(audio.bytes, audio.content_type, score, question)
        .map_err(AppError::Validation)?;

    info!(
        content_type = %submission.content_type,
        bytes = submission.audio.len(),
        "Speech analysis requested"
    );
    let result = state.speech.analyze(submission).await?;
    Ok(Json(result))
}
