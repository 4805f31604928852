use std::fmt;

use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const LEGACY_DOC_MIME: &str = "application/msword";

/// Recognised upload formats, derived once from the declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// `application/msword`. Decoded through the DOCX path.
    LegacyDoc,
}

impl DocumentFormat {
    pub const ACCEPTED: [DocumentFormat; 3] = [
        DocumentFormat::Pdf,
        DocumentFormat::Docx,
        DocumentFormat::LegacyDoc,
    ];

    /// Maps a declared MIME type to a format. Case and parameters
    /// (`; charset=...`) are ignored; the bytes are never inspected.
    pub fn from_mime(declared: &str) -> Option<Self> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Some(DocumentFormat::Pdf),
            DOCX_MIME => Some(DocumentFormat::Docx),
            LEGACY_DOC_MIME => Some(DocumentFormat::LegacyDoc),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => PDF_MIME,
            DocumentFormat::Docx => DOCX_MIME,
            DocumentFormat::LegacyDoc => LEGACY_DOC_MIME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::LegacyDoc => "DOC",
        }
    }

    /// "PDF, DOCX, DOC", for user-facing rejection messages.
    pub fn accepted_labels() -> String {
        Self::ACCEPTED
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognises_all_accepted_types() {
        assert_eq!(DocumentFormat::from_mime(PDF_MIME), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_mime(DOCX_MIME), Some(DocumentFormat::Docx));
        assert_eq!(
            DocumentFormat::from_mime(LEGACY_DOC_MIME),
            Some(DocumentFormat::LegacyDoc)
        );
    }

    #[test]
    fn test_ignores_case_and_parameters() {
        assert_eq!(
            DocumentFormat::from_mime("Application/PDF; name=resume.pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_mime("  application/msword "),
            Some(DocumentFormat::LegacyDoc)
        );
    }

    #[test]
    fn test_rejects_everything_else() {
        for declared in [
            "",
            "text/plain",
            "application/octet-stream",
            "application/rtf",
            "image/png",
            "application/pdfx",
        ] {
            assert_eq!(DocumentFormat::from_mime(declared), None, "{declared}");
        }
    }

    #[test]
    fn test_mime_type_round_trips_for_accepted_formats() {
        for format in DocumentFormat::ACCEPTED {
            assert_eq!(DocumentFormat::from_mime(format.mime_type()), Some(format));
        }
    }

    #[test]
    fn test_accepted_labels_lists_formats() {
        assert_eq!(DocumentFormat::accepted_labels(), "PDF, DOCX, DOC");
    }
}
