use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_AUDIO_TYPE: &str = "audio/webm";

/// A recorded answer ready to be sent for coaching.
#[derive(Debug, Clone)]
pub struct SpeechSubmission {
    pub audio: Bytes,
    pub content_type: String,
    /// Client-side energy / confidence reading taken while recording.
    pub score: f64,
    pub question: Option<String>,
}

impl SpeechSubmission {
    pub fn new(
        audio: Bytes,
        content_type: Option<String>,
        score: f64,
        question: Option<String>,
    ) -> Result<Self, String> {
        let content_type = content_type
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_AUDIO_TYPE.to_string());

        if !content_type.starts_with("audio/") {
            return Err(format!("'{content_type}' is not an audio type"));
        }
        if !score.is_finite() {
            return Err("score must be a finite number".to_string());
        }

        Ok(Self {
            audio,
            content_type,
            score,
            question: question.filter(|q| !q.trim().is_empty()),
        })
    }

    /// `recording.<ext>` matching the container, as the speech service
    /// sniffs the extension.
    pub fn file_name(&self) -> String {
        let essence = self.content_type.split(';').next().unwrap_or_default().trim();
        let ext = match essence {
            "audio/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/mp4" | "audio/x-m4a" => "m4a",
            _ => "bin",
        };
        format!("recording.{ext}")
    }
}

/// Coaching output. Only the presence of `metrics` and `feedback` is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAnalysisResult {
    pub metrics: Map<String, Value>,
    pub feedback: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpeechAnalysisResult {
    pub fn validate(&self) -> Result<(), String> {
        if self.feedback.is_null() {
            return Err("feedback is missing".to_string());
        }
        Ok(())
    }
}
