use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::intake::{normalize_in_background, DocumentFormat};
use crate::upload::UploadForm;

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub text: String,
    pub format: DocumentFormat,
    pub characters: usize,
}

/// POST /api/v1/intake/normalize
///
/// Multipart `file` → extracted plain text. Nothing is stored.
pub async fn handle_normalize(multipart: Multipart) -> Result<Json<NormalizeResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let document = form.take_document("file")?;

    let normalized = normalize_in_background(document).await?;

    Ok(Json(NormalizeResponse {
        characters: normalized.text.chars().count(),
        text: normalized.text,
        format: normalized.format,
    }))
}
