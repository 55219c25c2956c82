// Session lifecycle and per-user update serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::db::{Database, NavSession};
use crate::metrics;

/// One async mutex per user. A user's updates are handled strictly one
/// at a time by holding their gate across the whole read-decide-send
/// sequence; distinct users never contend.
#[derive(Debug, Clone)]
pub struct UserGates {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl UserGates {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fetch (or lazily create) the gate for a user.
    pub fn gate(&self, user_id: i64) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(user_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

impl Default for UserGates {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates, reads, and closes hunts. At most one active session exists
/// per user; starting a new hunt silently replaces the old one.
#[derive(Clone)]
pub struct SessionManager {
    db: Arc<Database>,
}

impl SessionManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Start a hunt for a cache, overwriting any previous session and
    /// resetting its progress.
    pub async fn start_session(
        &self,
        user_id: i64,
        cache_id: i64,
    ) -> Result<NavSession, sqlx::Error> {
        let session = self.db.upsert_session(user_id, cache_id).await?;
        metrics::SESSIONS_STARTED_TOTAL.inc();
        Ok(session)
    }

    /// Deactivate the user's hunt. Returns false (not an error) when
    /// there was nothing to stop.
    pub async fn stop_session(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let stopped = self.db.deactivate_session(user_id).await?;
        if stopped {
            metrics::SESSIONS_STOPPED_TOTAL.inc();
        }
        Ok(stopped)
    }

    pub async fn get_active_session(
        &self,
        user_id: i64,
    ) -> Result<Option<NavSession>, sqlx::Error> {
        self.db.get_active_session(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_manager() -> SessionManager {
        let db = Database::new("sqlite::memory:").await.unwrap();
        SessionManager::new(Arc::new(db))
    }

    #[test]
    fn test_gate_is_shared_per_user() {
        let gates = UserGates::new();
        let a = gates.gate(1);
        let b = gates.gate(1);
        let c = gates.gate(2);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_gate_excludes_second_holder() {
        let gates = UserGates::new();
        let gate = gates.gate(7);

        let guard = gate.lock().await;
        assert!(gates.gate(7).try_lock().is_err());
        drop(guard);
        assert!(gates.gate(7).try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_start_and_get_session() {
        let manager = test_manager().await;

        assert!(manager.get_active_session(1).await.unwrap().is_none());

        let session = manager.start_session(1, 10).await.unwrap();
        assert_eq!(session.cache_id, 10);
        assert!(session.is_active);

        let active = manager.get_active_session(1).await.unwrap().unwrap();
        assert_eq!(active.cache_id, 10);
    }

    #[tokio::test]
    async fn test_start_session_replaces_previous() {
        let manager = test_manager().await;

        manager.start_session(1, 10).await.unwrap();
        let replaced = manager.start_session(1, 20).await.unwrap();
        assert_eq!(replaced.cache_id, 20);
        assert!(replaced.last_message_id.is_none());

        // still exactly one active session
        let active = manager.get_active_session(1).await.unwrap().unwrap();
        assert_eq!(active.cache_id, 20);
    }

    #[tokio::test]
    async fn test_stop_session_is_noop_when_absent() {
        let manager = test_manager().await;

        assert!(!manager.stop_session(1).await.unwrap());

        manager.start_session(1, 10).await.unwrap();
        assert!(manager.stop_session(1).await.unwrap());
        assert!(!manager.stop_session(1).await.unwrap());
        assert!(manager.get_active_session(1).await.unwrap().is_none());
    }
}
