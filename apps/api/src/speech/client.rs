use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::analysis::client::{extract_error_message, AnalysisError};
use crate::speech::models::{SpeechAnalysisResult, SpeechSubmission};

/// Speech coaching backend. Same failure contract as the resume analyzer.
#[async_trait]
pub trait SpeechAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        submission: SpeechSubmission,
    ) -> Result<SpeechAnalysisResult, AnalysisError>;
}

/// Sends the clip as multipart parts `audio`, `score` and optional `question`.
#[derive(Clone)]
pub struct HttpSpeechAnalyzer {
    client: Client,
    endpoint: String,
}

impl HttpSpeechAnalyzer {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
        })
    }
}

fn build_form(submission: SpeechSubmission) -> Result<Form, AnalysisError> {
    let audio = Part::bytes(submission.audio.to_vec())
        .file_name(submission.file_name())
        .mime_str(&submission.content_type)?;

    let mut form = Form::new()
        .part("audio", audio)
        .text("score", submission.score.to_string());
    if let Some(question) = submission.question {
        form = form.text("question", question);
    }
    Ok(form)
}

#[async_trait]
impl SpeechAnalyzer for HttpSpeechAnalyzer {
    async fn analyze(
        &self,
        submission: SpeechSubmission,
    ) -> Result<SpeechAnalysisResult, AnalysisError> {
        let clip_bytes = submission.audio.len();
        let form = build_form(submission)?;

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Speech API returned {}: {}", status, body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let result = parse_speech_result(&body)?;
        debug!(clip_bytes, "Speech analysis succeeded");
        Ok(result)
    }
}

pub fn parse_speech_result(body: &str) -> Result<SpeechAnalysisResult, AnalysisError> {
    let result: SpeechAnalysisResult =
        serde_json::from_str(body).map_err(|e| AnalysisError::Malformed(e.to_string()))?;
    result.validate().map_err(AnalysisError::Malformed)?;
    Ok(result)
}
