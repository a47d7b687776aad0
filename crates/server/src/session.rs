//! Session management
//!
//! Holds the mutable conversation state for each active session. Turns for
//! one session are serialized through a per-session async mutex: a request
//! holds the lock for its full turn, so two in-flight requests for the same
//! session id cannot race on the profile. Distinct sessions run fully
//! concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::watch;

use lead_agent_core::ConversationState;

use crate::ServerError;

/// One active chat session.
pub struct ChatSession {
    pub id: String,
    /// Conversation state, locked for the duration of each turn
    pub state: tokio::sync::Mutex<ConversationState>,
    created_at: Instant,
    last_activity: RwLock<Instant>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            state: tokio::sync::Mutex::new(ConversationState::new(&id, user_id)),
            id,
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Time since the session was created
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// Session manager with a capacity cap and idle expiry.
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(max_sessions: usize, session_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval: Duration::from_secs(300),
        }
    }

    /// Fetch an existing session or create one keyed by the caller-supplied
    /// session id.
    pub fn get_or_create(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Arc<ChatSession>, ServerError> {
        if let Some(session) = self.sessions.read().get(session_id) {
            return Ok(session.clone());
        }

        let mut sessions = self.sessions.write();
        // Re-check under the write lock
        if let Some(session) = sessions.get(session_id) {
            return Ok(session.clone());
        }

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);
            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Session("Max sessions reached".to_string()));
            }
        }

        let session = Arc::new(ChatSession::new(session_id, user_id));
        sessions.insert(session_id.to_string(), session.clone());
        tracing::info!(session_id = %session_id, "Created session");
        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session
    pub fn remove(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            tracing::info!(session_id = %id, "Removed session");
        }
    }

    /// Get active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// List all session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Cleanup expired sessions
    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<ChatSession>>) {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Expired session");
        }
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Returns a shutdown sender that stops the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                removed = before - after,
                                remaining = after,
                                "Session cleanup"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(10, Duration::from_secs(3600))
    }

    #[test]
    fn test_get_or_create_reuses_session() {
        let manager = manager();
        let first = manager.get_or_create("s1", "u1").unwrap();
        let second = manager.get_or_create("s1", "u1").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_remove() {
        let manager = manager();
        manager.get_or_create("s1", "u1").unwrap();
        manager.remove("s1");
        assert!(manager.get("s1").is_none());
    }

    #[test]
    fn test_capacity_cap() {
        let manager = SessionManager::new(2, Duration::from_secs(3600));
        manager.get_or_create("s1", "u1").unwrap();
        manager.get_or_create("s2", "u2").unwrap();
        assert!(manager.get_or_create("s3", "u3").is_err());

        // Existing sessions are still reachable at capacity
        assert!(manager.get_or_create("s1", "u1").is_ok());
    }

    #[test]
    fn test_expiry() {
        let manager = SessionManager::new(10, Duration::from_millis(0));
        manager.get_or_create("s1", "u1").unwrap();
        let session = manager.get("s1").unwrap();

        std::thread::sleep(Duration::from_millis(5));
        assert!(session.is_expired(Duration::from_millis(0)));

        manager.cleanup_expired();
        assert_eq!(manager.count(), 0);
    }

    #[tokio::test]
    async fn test_turns_serialize_through_session_lock() {
        let manager = manager();
        let session = manager.get_or_create("s1", "u1").unwrap();

        let guard = session.state.lock().await;
        assert!(session.state.try_lock().is_err());
        drop(guard);
        assert!(session.state.try_lock().is_ok());
    }
}
