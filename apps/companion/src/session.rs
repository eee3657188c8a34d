//! Per-session context. Replaces a process-wide mutable record: each handler
//! receives the one session it works on, locked for the whole user action.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::StudentProfile;
use crate::quiz::session::QuizSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SessionContext {
    pub profile: StudentProfile,
    pub history: Vec<ChatTurn>,
    pub quiz: QuizSession,
}

impl SessionContext {
    pub fn new(profile: StudentProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn record(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role,
            content: content.into(),
            at: Utc::now(),
        });
    }
}

pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Idle lifetime used by `SessionStore::default`.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

struct SessionEntry {
    session: SharedSession,
    last_active: DateTime<Utc>,
}

/// All live sessions, keyed by id. Lost on restart.
///
/// A session untouched for longer than `ttl` is evicted the next time any
/// session is created or looked up.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self, profile: StudentProfile) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        Self::evict(&mut sessions, now, self.ttl);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(SessionContext::new(profile))),
                last_active: now,
            },
        );
        info!("Session {id} created");
        id
    }

    /// Looks up a session and marks it active.
    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        Self::evict(&mut sessions, now, self.ttl);
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_active = now;
        Ok(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Session {id} discarded");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Session {id} not found"))),
        }
    }

    /// Drops every session idle since before `now - ttl`. Returns how many went.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        Self::evict(&mut *self.sessions.write().await, now, self.ttl)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn evict(
        sessions: &mut HashMap<Uuid, SessionEntry>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = now - entry.last_active <= ttl;
            if !keep {
                debug!("Session {id} expired after {} idle minutes", ttl.num_minutes());
            }
            keep
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::default();
        let id = store.create(StudentProfile::default()).await;
        assert_eq!(store.count().await, 1);

        let session = store.get(id).await.unwrap();
        session.lock().await.record(Role::User, "hello");
        assert_eq!(store.get(id).await.unwrap().lock().await.history.len(), 1);

        store.remove(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(store.remove(id).await.is_err());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.create(StudentProfile::default()).await;
        let b = store.create(StudentProfile::default()).await;
        store.get(a).await.unwrap().lock().await.record(Role::User, "only a");
        assert!(store.get(b).await.unwrap().lock().await.history.is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_evicted_after_ttl() {
        let store = SessionStore::new(Duration::minutes(30));
        let id = store.create(StudentProfile::default()).await;

        assert_eq!(store.evict_idle(Utc::now() + Duration::minutes(29)).await, 0);
        assert_eq!(store.count().await, 1);

        assert_eq!(store.evict_idle(Utc::now() + Duration::minutes(31)).await, 1);
        assert_eq!(store.count().await, 0);
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_session_dropped_on_next_create() {
        let store = SessionStore::new(Duration::zero());
        let stale = store.create(StudentProfile::default()).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        store.create(StudentProfile::default()).await;
        assert_eq!(store.count().await, 1);
        assert!(store.get(stale).await.is_err());
    }

    #[tokio::test]
    async fn test_get_refreshes_last_active() {
        let store = SessionStore::new(Duration::minutes(30));
        let id = store.create(StudentProfile::default()).await;
        let created = store.sessions.read().await[&id].last_active;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.get(id).await.unwrap();
        let touched = store.sessions.read().await[&id].last_active;
        assert!(touched > created);
    }
}
