//! Drives one submission through an analyzer session:
//! submit → normalize → analyze → succeed / fail.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::client::Analyzer;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::sessions::{AnalyzerSession, SessionSnapshot};
use crate::errors::AppError;
use crate::intake::{normalize_in_background, UploadedDocument};

/// Runs a full submission. Every failure after `submit` resolves the ticket,
/// so the session always ends up back in `Input` or in `Dashboard`.
///
/// Returns the error that sent the session back to `Input` so the caller can
/// surface it as well.
pub async fn run_submission(
    session: Arc<AnalyzerSession>,
    analyzer: Arc<dyn Analyzer>,
    document: UploadedDocument,
    job_description: String,
) -> Result<SessionSnapshot, AppError> {
    let ticket = session.submit().await?;
    info!(session_id = %session.id, declared_type = %document.declared_type, "Analysis submitted");

    match analyze_document(analyzer.as_ref(), document, job_description).await {
        Ok(result) => {
            session.succeed(ticket, result).await?;
            info!(session_id = %session.id, "Analysis complete");
            Ok(session.snapshot().await)
        }
        Err(e) => {
            warn!(session_id = %session.id, "Analysis submission failed: {e}");
            session.fail(ticket, e.user_message()).await?;
            Err(e)
        }
    }
}

async fn analyze_document(
    analyzer: &dyn Analyzer,
    document: UploadedDocument,
    job_description: String,
) -> Result<AnalysisResult, AppError> {
    let normalized = normalize_in_background(document).await?;
    let request = AnalysisRequest {
        resume_text: normalized.text,
        job_description,
    };
    Ok(analyzer.analyze(&request).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::analysis::client::AnalysisError;
    use crate::analysis::models::sample_result;
    use crate::analysis::sessions::SessionRegistry;
    use crate::intake::fixtures::{docx_with_body, paragraph, pdf_with_pages};
    use crate::intake::format::{DOCX_MIME, PDF_MIME};

    /// Records calls; blocks each call until released when gated.
    struct ScriptedAnalyzer {
        calls: AtomicUsize,
        last_request: std::sync::Mutex<Option<AnalysisRequest>>,
        gate: Option<(Notify, Notify)>,
        outcome: fn() -> Result<AnalysisResult, AnalysisError>,
    }

    impl ScriptedAnalyzer {
        fn new(outcome: fn() -> Result<AnalysisResult, AnalysisError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_request: std::sync::Mutex::new(None),
                gate: None,
                outcome,
            }
        }

        fn gated(outcome: fn() -> Result<AnalysisResult, AnalysisError>) -> Self {
            Self {
                gate: Some((Notify::new(), Notify::new())),
                ..Self::new(outcome)
            }
        }
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        async fn analyze(
            &self,
            request: &AnalysisRequest,
        ) -> Result<AnalysisResult, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            (self.outcome)()
        }
    }

    fn resume_docx() -> UploadedDocument {
        UploadedDocument::new(
            docx_with_body(&[paragraph("Experience: 5 years"), paragraph("Rust, Tokio")]),
            DOCX_MIME,
        )
    }

    #[tokio::test]
    async fn test_success_lands_on_dashboard() {
        let session = SessionRegistry::new(Duration::from_secs(60)).create().await;
        let analyzer = Arc::new(ScriptedAnalyzer::new(|| Ok(sample_result())));

        let snapshot = run_submission(
            session.clone(),
            analyzer.clone(),
            resume_docx(),
            "Senior Rust engineer".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(snapshot.view, "dashboard");
        assert_eq!(snapshot.result, Some(sample_result()));

        let request = analyzer.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.resume_text, "Experience: 5 years\nRust, Tokio\n");
        assert_eq!(request.job_description, "Senior Rust engineer");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_returns_to_input_without_calling_analyzer() {
        let session = SessionRegistry::new(Duration::from_secs(60)).create().await;
        let analyzer = Arc::new(ScriptedAnalyzer::new(|| Ok(sample_result())));

        let full = pdf_with_pages(&["Hello World"]);
        let truncated = UploadedDocument::new(full[..full.len().min(48)].to_vec(), PDF_MIME);

        let err = run_submission(session.clone(), analyzer.clone(), truncated, "JD".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DocumentDecode(_)));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.view, "input");
        assert!(snapshot.notice.unwrap().starts_with("Could not read"));
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);

        // Submit-ready again.
        let snapshot = run_submission(session, analyzer, resume_docx(), "JD".to_string())
            .await
            .unwrap();
        assert_eq!(snapshot.view, "dashboard");
    }

    #[tokio::test]
    async fn test_unsupported_format_returns_to_input() {
        let session = SessionRegistry::new(Duration::from_secs(60)).create().await;
        let analyzer = Arc::new(ScriptedAnalyzer::new(|| Ok(sample_result())));

        let err = run_submission(
            session.clone(),
            analyzer,
            UploadedDocument::new(b"plain text resume".to_vec(), "text/plain"),
            "JD".to_string(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert_eq!(session.snapshot().await.view, "input");
    }

    #[tokio::test]
    async fn test_service_error_message_is_surfaced() {
        let session = SessionRegistry::new(Duration::from_secs(60)).create().await;
        let analyzer = Arc::new(ScriptedAnalyzer::new(|| {
            Err(AnalysisError::Api {
                status: 429,
                message: Some("Daily analysis limit reached".to_string()),
            })
        }));

        let err = run_submission(session.clone(), analyzer, resume_docx(), "JD".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AnalysisRequestFailed(_)));
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.view, "input");
        assert_eq!(snapshot.notice.as_deref(), Some("Daily analysis limit reached"));
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected_while_loading() {
        let session = SessionRegistry::new(Duration::from_secs(60)).create().await;
        let analyzer = Arc::new(ScriptedAnalyzer::gated(|| Ok(sample_result())));

        let first = tokio::spawn(run_submission(
            session.clone(),
            analyzer.clone(),
            resume_docx(),
            "JD".to_string(),
        ));

        let (entered, release) = analyzer.gate.as_ref().unwrap();
        entered.notified().await;
        assert_eq!(session.snapshot().await.view, "loading");

        let second = run_submission(session.clone(), analyzer.clone(), resume_docx(), "JD".to_string())
            .await
            .unwrap_err();
        assert!(matches!(second, AppError::Conflict(_)));

        release.notify_one();
        let snapshot = first.await.unwrap().unwrap();
        assert_eq!(snapshot.view, "dashboard");
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
    }
}
