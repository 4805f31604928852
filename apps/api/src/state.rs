use std::sync::Arc;

use crate::analysis::client::Analyzer;
use crate::analysis::sessions::SessionRegistry;
use crate::config::Config;
use crate::speech::client::SpeechAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable analysis backend. Default: HttpAnalyzer against ANALYSIS_API_URL.
    pub analyzer: Arc<dyn Analyzer>,
    pub speech: Arc<dyn SpeechAnalyzer>,
    /// In-memory analyzer sessions, one view controller each.
    pub sessions: SessionRegistry,
}
