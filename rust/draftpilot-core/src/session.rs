//! Writing-session registry.
//!
//! Sessions live for the lifetime of the process only; durable persistence
//! is explicitly out of scope. The registry is a sharded concurrent map
//! (`DashMap`), so lookups and mutations for distinct session ids never
//! contend on a single lock and cross-session operations never coordinate.
//!
//! # Example
//!
//! ```rust,ignore
//! use draftpilot_core::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let id = store.create(profile);
//! store.with_session(&id, |session| session.set_draft("Hello"))?;
//! let removed = store.remove(&id)?;
//! ```

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::domain::{ScoreSnapshot, SuggestionPayload, UserProfile};
use crate::error::{AssistError, AssistResult};

/// An active writing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub session_id: String,

    /// Owning profile, fixed for the session's lifetime.
    pub profile: UserProfile,

    /// Latest draft text.
    pub current_draft: String,

    /// Suggestion payloads delivered so far, oldest first.
    pub suggestion_history: Vec<SuggestionPayload>,

    /// Score snapshots recorded so far, oldest first.
    pub score_history: Vec<ScoreSnapshot>,

    /// Session creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last draft-update timestamp.
    pub last_updated: DateTime<Utc>,

    /// Whether the session is still accepting updates.
    pub is_active: bool,

    /// Monotonic counter bumped on every draft update. A workflow run
    /// records the revision it started from; results for a superseded
    /// revision are discarded instead of overwriting newer state.
    pub draft_revision: u64,
}

impl Session {
    /// Create a fresh session for a profile.
    #[must_use]
    pub fn new(profile: UserProfile) -> Self {
        let now = Utc::now();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            profile,
            current_draft: String::new(),
            suggestion_history: Vec::new(),
            score_history: Vec::new(),
            created_at: now,
            last_updated: now,
            is_active: true,
            draft_revision: 0,
        }
    }

    /// Replace the draft, bump the revision, and return the new revision.
    pub fn set_draft(&mut self, draft: impl Into<String>) -> u64 {
        self.current_draft = draft.into();
        self.draft_revision += 1;
        self.last_updated = Utc::now();
        self.draft_revision
    }

    /// Append a completed update's payload and score snapshot.
    pub fn record_result(&mut self, payload: SuggestionPayload, snapshot: ScoreSnapshot) {
        self.suggestion_history.push(payload);
        self.score_history.push(snapshot);
        self.last_updated = Utc::now();
    }

    /// Mean overall score across the session, 0.0 when never scored.
    #[must_use]
    pub fn average_score(&self) -> f64 {
        if self.score_history.is_empty() {
            return 0.0;
        }
        let total: f64 = self.score_history.iter().map(|s| s.overall_score).sum();
        total / self.score_history.len() as f64
    }
}

/// Concurrency-safe registry of active sessions keyed by session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a new session for a profile and return its id.
    pub fn create(&self, profile: UserProfile) -> String {
        let session = Session::new(profile);
        let session_id = session.session_id.clone();

        tracing::info!(
            session_id = %session_id,
            user_id = %session.profile.user_id,
            "session started"
        );

        self.sessions.insert(session_id.clone(), session);
        session_id
    }

    /// Run a closure against a session under its shard lock.
    ///
    /// The closure must be quick and must not await; the shard stays
    /// locked for its duration.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::SessionNotFound`] for an unknown id.
    pub fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> T,
    ) -> AssistResult<T> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AssistError::SessionNotFound(session_id.to_string()))?;
        Ok(f(entry.value_mut()))
    }

    /// Clone a session's current state.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::SessionNotFound`] for an unknown id.
    pub fn snapshot(&self, session_id: &str) -> AssistResult<Session> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AssistError::SessionNotFound(session_id.to_string()))
    }

    /// Remove a session and return its final state.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::SessionNotFound`] for an unknown id; a second
    /// removal of the same id therefore fails.
    pub fn remove(&self, session_id: &str) -> AssistResult<Session> {
        self.sessions
            .remove(session_id)
            .map(|(_, mut session)| {
                session.is_active = false;
                tracing::info!(session_id = %session.session_id, "session ended");
                session
            })
            .ok_or_else(|| AssistError::SessionNotFound(session_id.to_string()))
    }

    /// Whether a session id is currently registered.
    #[must_use]
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove sessions idle for longer than `max_idle` and return the count.
    ///
    /// There is no automatic expiry; hosts decide when (and whether) to
    /// call this.
    pub fn cleanup_expired(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let before = self.sessions.len();

        self.sessions
            .retain(|_, session| session.last_updated >= cutoff);

        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(removed, "cleaned up idle sessions");
        }
        removed
    }
}
