//! Session middleware configuration.
//!
//! Sessions hold the shopper's stores (cart, wishlist, selections). They are
//! kept in memory: nothing in a session outlives the process. The store is a
//! `moka` cache, so idle sessions are evicted and the number of live sessions
//! is capped.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "orchard_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions held at once; the least recently used are evicted first.
const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store with idle eviction and a size cap.
#[derive(Clone)]
pub struct BoundedMemoryStore {
    sessions: Cache<Id, Record>,
}

impl BoundedMemoryStore {
    /// Create a store holding at most `max_sessions`, each dropped after
    /// `idle` without being read or written.
    #[must_use]
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { sessions }
    }
}

impl fmt::Debug for BoundedMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedMemoryStore")
            .field("sessions", &self.sessions.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for BoundedMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Pick a fresh id on collision instead of overwriting a live session.
        loop {
            let entry = self
                .sessions
                .entry(record.id)
                .or_insert(record.clone())
                .await;
            if entry.is_fresh() {
                return Ok(());
            }
            record.id = Id::default();
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.sessions.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .sessions
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.sessions.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer backed by a bounded in-memory store.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> SessionManagerLayer<BoundedMemoryStore> {
    let store = BoundedMemoryStore::new(
        MAX_SESSIONS,
        Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs()),
    );

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record(ttl: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + ttl,
        }
    }

    fn store() -> BoundedMemoryStore {
        BoundedMemoryStore::new(MAX_SESSIONS, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = store();
        let mut live = record(TimeDuration::hours(1));
        live.data.insert("cart".to_string(), serde_json::json!({}));

        store.create(&mut live).await.unwrap();
        let loaded = store.load(&live.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, live.data);

        store.delete(&live.id).await.unwrap();
        assert!(store.load(&live.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_never_overwrites_existing_id() {
        let store = store();
        let mut first = record(TimeDuration::hours(1));
        store.create(&mut first).await.unwrap();

        let mut second = record(TimeDuration::hours(1));
        second.id = first.id;
        second
            .data
            .insert("owner".to_string(), serde_json::json!("grace"));
        store.create(&mut second).await.unwrap();

        assert_ne!(second.id, first.id);
        let kept = store.load(&first.id).await.unwrap().unwrap();
        assert!(kept.data.is_empty());
        let created = store.load(&second.id).await.unwrap().unwrap();
        assert_eq!(created.data, second.data);
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let store = store();
        let stale = record(TimeDuration::seconds(-1));
        store.save(&stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_count_is_bounded() {
        let store = BoundedMemoryStore::new(8, Duration::from_secs(60));
        for _ in 0..64 {
            store.save(&record(TimeDuration::hours(1))).await.unwrap();
        }
        store.sessions.run_pending_tasks().await;

        assert!(store.sessions.entry_count() <= 8);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = BoundedMemoryStore::new(MAX_SESSIONS, Duration::from_millis(50));
        let idle = record(TimeDuration::hours(1));
        store.save(&idle).await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.load(&idle.id).await.unwrap().is_none());
    }
}
