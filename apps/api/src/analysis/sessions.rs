use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::analysis::view::{AnalysisViewController, SubmissionTicket, TransitionError, ViewState};

/// One analyzer screen: a view controller addressable by id.
///
/// The controller lock is only held for a transition, never across the
/// analysis call, so a concurrent submit sees `Loading` and is turned away.
#[derive(Debug)]
pub struct AnalyzerSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    inner: Mutex<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    controller: AnalysisViewController,
    updated_at: DateTime<Utc>,
    /// Monotonic twin of `updated_at`, also bumped by reads. Drives eviction.
    last_active: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub view: &'static str,
    pub result: Option<AnalysisResult>,
    pub notice: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalyzerSession {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            inner: Mutex::new(SessionInner {
                controller: AnalysisViewController::new(),
                updated_at: now,
                last_active: Instant::now(),
            }),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;
        inner.last_active = Instant::now();
        let controller = &inner.controller;
        SessionSnapshot {
            session_id: self.id,
            view: controller.state().name(),
            result: match controller.state() {
                ViewState::Dashboard(result) => Some(result.clone()),
                _ => None,
            },
            notice: controller.notice().map(str::to_string),
            created_at: self.created_at,
            updated_at: inner.updated_at,
        }
    }

    pub async fn submit(&self) -> Result<SubmissionTicket, TransitionError> {
        self.transition(|c| c.submit()).await
    }

    pub async fn succeed(
        &self,
        ticket: SubmissionTicket,
        result: AnalysisResult,
    ) -> Result<(), TransitionError> {
        self.transition(|c| c.succeed(ticket, result)).await
    }

    pub async fn fail(&self, ticket: SubmissionTicket, message: String) -> Result<(), TransitionError> {
        self.transition(|c| c.fail(ticket, message)).await
    }

    pub async fn reset(&self) -> Result<(), TransitionError> {
        self.transition(|c| c.reset()).await
    }

    async fn transition<T>(
        &self,
        apply: impl FnOnce(&mut AnalysisViewController) -> Result<T, TransitionError>,
    ) -> Result<T, TransitionError> {
        let mut inner = self.inner.lock().await;
        let outcome = apply(&mut inner.controller)?;
        inner.updated_at = Utc::now();
        inner.last_active = Instant::now();
        Ok(outcome)
    }

    /// Idle for at least `ttl` and not mid-submission. A session whose lock is
    /// held is in use and never idle.
    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        match self.inner.try_lock() {
            Ok(inner) => {
                !matches!(inner.controller.state(), ViewState::Loading)
                    && now.duration_since(inner.last_active) >= ttl
            }
            Err(_) => false,
        }
    }
}

/// In-memory registry of analyzer sessions. Nothing is persisted; sessions
/// untouched for `idle_ttl` are evicted.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<AnalyzerSession>>>>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    /// Also sweeps idle sessions, so the map stays bounded even without the
    /// background sweeper.
    pub async fn create(&self) -> Arc<AnalyzerSession> {
        self.evict_idle().await;
        let session = Arc::new(AnalyzerSession::new());
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::clone(&session));
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<AnalyzerSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops the session. An in-flight submission still completes against
    /// its own handle; the outcome is simply no longer reachable.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes every idle session and returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, self.idle_ttl));
        before - sessions.len()
    }

    /// Sweeps on a fixed interval for the lifetime of the process.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle().await;
                if evicted > 0 {
                    let open_sessions = registry.len().await;
                    info!(
                        evicted,
                        open_sessions,
                        "Idle analyzer sessions evicted"
                    );
                }
            }
        })
    }
}
