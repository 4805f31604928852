//! Document intake: uploaded PDF / Word bytes → plain text for analysis.
//!
//! The declared MIME type alone decides the decode path. Unknown types are
//! rejected before any byte is read.

pub mod docx;
pub mod format;
pub mod handlers;
pub mod pdf;

#[cfg(test)]
pub(crate) mod fixtures;

use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

pub use format::DocumentFormat;

/// A client-supplied file. Consumed by a single `normalize` call.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Bytes,
    pub declared_type: String,
}

impl UploadedDocument {
    pub fn new(bytes: impl Into<Bytes>, declared_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// Extracted text. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedText {
    pub text: String,
    pub format: DocumentFormat,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("unsupported document type '{declared}'")]
    UnsupportedFormat { declared: String },

    #[error("could not decode {format} document: {reason}")]
    DocumentDecode {
        format: DocumentFormat,
        reason: String,
    },
}

impl IntakeError {
    /// Message safe to show to the person who uploaded the file.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::UnsupportedFormat { declared } => format!(
                "Unsupported file type '{declared}'. Please upload one of: {}.",
                DocumentFormat::accepted_labels()
            ),
            IntakeError::DocumentDecode { format, .. } => format!(
                "Could not read the uploaded {format} file. It may be corrupt, encrypted or empty."
            ),
        }
    }
}

pub fn normalize(document: UploadedDocument) -> Result<NormalizedText, IntakeError> {
    let format = DocumentFormat::from_mime(&document.declared_type).ok_or_else(|| {
        IntakeError::UnsupportedFormat {
            declared: document.declared_type.clone(),
        }
    })?;

    let extracted = match format {
        DocumentFormat::Pdf => pdf::extract_text(&document.bytes),
        DocumentFormat::Docx | DocumentFormat::LegacyDoc => docx::extract_text(&document.bytes),
    };

    let text = extracted.map_err(|e| IntakeError::DocumentDecode {
        format,
        reason: format!("{e:#}"),
    })?;

    if text.trim().is_empty() {
        return Err(IntakeError::DocumentDecode {
            format,
            reason: "document contains no extractable text".to_string(),
        });
    }

    debug!(%format, bytes = document.bytes.len(), chars = text.len(), "Document normalized");
    Ok(NormalizedText { text, format })
}

/// Runs `normalize` on the blocking pool so decoding never stalls the runtime.
pub async fn normalize_in_background(document: UploadedDocument) -> Result<NormalizedText, AppError> {
    let normalized = tokio::task::spawn_blocking(move || normalize(document))
        .await
        .context("document decode task failed")??;
    Ok(normalized)
}
