//! In-memory store for interactions that are still in progress.
//!
//! The store is the explicit home of active-session state: sessions are
//! created when an interaction starts, accumulate transcript turns while it
//! runs, and leave the store exactly once - either through finalize (the
//! caller takes the session and persists the terminal record) or through the
//! idle-eviction sweep. Session identifiers are UUIDv4 and never reused.

use crate::{
    core::screening::{Channel, Screening},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::Duration,
};
use tracing::info;

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The person calling or chatting in
    Caller,
    /// The automated receptionist
    Assistant,
}

/// One turn of an interaction's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    /// Who spoke
    pub role: TurnRole,
    /// What was said
    pub content: String,
}

/// Caller identity captured at interaction start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    /// Name the caller declared, if any
    pub name: Option<String>,
    /// Caller phone number, if known
    pub phone: Option<String>,
    /// Caller email, if known
    pub email: Option<String>,
}

/// One in-progress interaction.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// Unique session identifier (UUIDv4)
    pub session_id: String,
    /// The account being called
    pub account_id: i64,
    /// Phone call or web chat
    pub channel: Channel,
    /// Caller identity captured at start
    pub caller: CallerInfo,
    /// The screening decision taken at interaction start
    pub screening: Screening,
    /// Conversation turns so far, in order
    pub transcript: Vec<TranscriptTurn>,
    /// When the interaction started
    pub started_at: DateTime<Utc>,
    /// Last time a turn was appended (or start time if none were)
    pub last_activity: DateTime<Utc>,
}

/// Thread-safe store of active sessions keyed by session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ActiveSession>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ActiveSession>> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a session for a freshly screened interaction and returns its
    /// new session id.
    pub fn start(
        &self,
        account_id: i64,
        channel: Channel,
        caller: CallerInfo,
        screening: Screening,
    ) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let session = ActiveSession {
            session_id: session_id.clone(),
            account_id,
            channel,
            caller,
            screening,
            transcript: Vec::new(),
            started_at: now,
            last_activity: now,
        };
        self.lock().insert(session_id.clone(), session);
        session_id
    }

    /// Appends one transcript turn to an active session, refreshing its
    /// last-activity time.
    pub fn append_turn(&self, session_id: &str, role: TurnRole, content: String) -> Result<()> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound {
                session_id: session_id.to_string(),
            })?;
        session.transcript.push(TranscriptTurn { role, content });
        session.last_activity = Utc::now();
        Ok(())
    }

    /// Returns a copy of an active session, if present.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<ActiveSession> {
        self.lock().get(session_id).cloned()
    }

    /// Removes and returns a session for finalization.
    ///
    /// Only one caller can ever receive a given session: concurrent finalize
    /// attempts for the same id see None after the first take.
    #[must_use]
    pub fn take(&self, session_id: &str) -> Option<ActiveSession> {
        self.lock().remove(session_id)
    }

    /// Removes and returns every session idle for longer than `max_idle`,
    /// so the sweep can finalize them as abandoned.
    pub fn evict_idle(&self, max_idle: Duration) -> Vec<ActiveSession> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(max_idle).unwrap_or_else(|_| chrono::Duration::zero());
        let mut sessions = self.lock();
        let expired: Vec<String> = sessions
            .values()
            .filter(|session| session.last_activity < cutoff)
            .map(|session| session.session_id.clone())
            .collect();

        let mut evicted = Vec::with_capacity(expired.len());
        for session_id in expired {
            if let Some(session) = sessions.remove(&session_id) {
                info!(session_id = %session.session_id, "evicting idle session");
                evicted.push(session);
            }
        }
        evicted
    }

    /// Number of currently active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no active sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Serializes a transcript for the interaction record's JSON column.
#[must_use]
pub fn transcript_to_json(transcript: &[TranscriptTurn]) -> serde_json::Value {
    serde_json::to_value(transcript).unwrap_or(serde_json::Value::Null)
}

/// Serializes caller info for the interaction record's JSON column.
#[must_use]
pub fn caller_info_to_json(caller: &CallerInfo) -> serde_json::Value {
    serde_json::to_value(caller).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::screening::{Audit, Decision};

    fn default_screening() -> Screening {
        Screening {
            decision: Decision::Allow,
            audit: Audit::Default,
            redirect_target: None,
        }
    }

    fn start_session(store: &SessionStore) -> String {
        store.start(1, Channel::Web, CallerInfo::default(), default_screening())
    }

    #[test]
    fn test_start_creates_unique_sessions() {
        let store = SessionStore::new();
        let first = start_session(&store);
        let second = start_session(&store);

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first).unwrap().account_id, 1);
    }

    #[test]
    fn test_append_turn_builds_ordered_transcript() {
        let store = SessionStore::new();
        let id = start_session(&store);

        store
            .append_turn(&id, TurnRole::Caller, "Hi, is Dana in?".to_string())
            .unwrap();
        store
            .append_turn(&id, TurnRole::Assistant, "May I take a message?".to_string())
            .unwrap();

        let session = store.get(&id).unwrap();
        assert_eq!(session.transcript.len(), 2);
        assert_eq!(session.transcript[0].role, TurnRole::Caller);
        assert_eq!(session.transcript[1].role, TurnRole::Assistant);
    }

    #[test]
    fn test_append_turn_unknown_session() {
        let store = SessionStore::new();
        let result = store.append_turn("nope", TurnRole::Caller, "hello".to_string());
        assert!(matches!(result, Err(Error::SessionNotFound { .. })));
    }

    #[test]
    fn test_take_is_exactly_once() {
        let store = SessionStore::new();
        let id = start_session(&store);

        assert!(store.take(&id).is_some());
        assert!(store.take(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_evict_idle_removes_only_stale_sessions() {
        let store = SessionStore::new();
        let stale = start_session(&store);
        let fresh = start_session(&store);

        // Backdate one session's activity past the cutoff.
        {
            let mut sessions = store.lock();
            let session = sessions.get_mut(&stale).unwrap();
            session.last_activity = Utc::now() - chrono::Duration::minutes(45);
        }

        let evicted = store.evict_idle(Duration::from_secs(30 * 60));
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].session_id, stale);
        assert!(store.get(&fresh).is_some());
        assert!(store.get(&stale).is_none());
    }

    #[test]
    fn test_transcript_json_shape() {
        let transcript = vec![TranscriptTurn {
            role: TurnRole::Caller,
            content: "Hi".to_string(),
        }];
        let raw = transcript_to_json(&transcript);
        assert_eq!(raw[0]["role"], "caller");
        assert_eq!(raw[0]["content"], "Hi");
    }
}
