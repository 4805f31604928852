//! Client for the external analysis services.
//!
//! No other module talks to the analysis endpoint directly. Calls are made
//! once: there is no automatic retry, a failed analysis is resubmitted by the
//! user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::{AnalysisRequest, AnalysisResult};

/// Shown when the service gives no usable message of its own.
pub const FALLBACK_MESSAGE: &str = "Analysis failed. Please try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl AnalysisError {
    /// The server-provided message when there is one, else a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Resume analysis backend. `AppState` holds an `Arc<dyn Analyzer>`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

/// Posts `{resumeText, jobDescription}` as JSON to the configured endpoint.
#[derive(Clone)]
pub struct HttpAnalyzer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAnalyzer {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            call = call.header("x-api-key", key);
        }

        let response = call.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Analysis API returned {}: {}", status, body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let result = parse_analysis_result(&body)?;
        debug!(
            matched = result.keywords.matched.len(),
            missing = result.keywords.missing.len(),
            rewrites = result.rewrites.len(),
            "Analysis call succeeded"
        );
        Ok(result)
    }
}

pub fn parse_analysis_result(body: &str) -> Result<AnalysisResult, AnalysisError> {
    let result: AnalysisResult =
        serde_json::from_str(body).map_err(|e| AnalysisError::Malformed(e.to_string()))?;
    result.validate().map_err(AnalysisError::Malformed)?;
    Ok(result)
}

/// Pulls a human-readable message out of an error body.
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}` and `{"message": "..."}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let message = match value.get("error") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(err) => err.get("message").and_then(Value::as_str),
        None => None,
    }
    .or_else(|| value.get("message").and_then(Value::as_str))?;

    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}
