//! Multipart form collection shared by the upload endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::intake::UploadedDocument;

/// Declared type recorded when the client omits a part's `Content-Type`.
const UNDECLARED_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A fully buffered multipart body. Parts with a filename or content type are
/// treated as files, everything else as text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, FilePart>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            if form.files.contains_key(&name) || form.fields.contains_key(&name) {
                return Err(AppError::Validation(format!(
                    "'{name}' was sent more than once"
                )));
            }

            if file_name.is_some() || content_type.is_some() {
                let bytes = field.bytes().await?;
                form.files.insert(
                    name,
                    FilePart {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            } else {
                form.fields.insert(name, field.text().await?);
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Result<FilePart, AppError> {
        self.files
            .remove(name)
            .filter(|part| !part.bytes.is_empty())
            .ok_or_else(|| AppError::Validation(format!("'{name}' file is required")))
    }

    /// The named file as an intake document. The declared type is taken
    /// verbatim from the part's `Content-Type`, never from the filename.
    pub fn take_document(&mut self, name: &str) -> Result<UploadedDocument, AppError> {
        let part = self.take_file(name)?;
        let declared = part
            .content_type
            .unwrap_or_else(|| UNDECLARED_TYPE.to_string());
        debug!(
            file_name = part.file_name.as_deref().unwrap_or("-"),
            declared_type = %declared,
            bytes = part.bytes.len(),
            "Upload received"
        );
        Ok(UploadedDocument::new(part.bytes, declared))
    }

    /// A text field, trimmed. Missing and blank are the same thing.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("{name} cannot be empty")))
    }
}
