use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabli_core::staff::StaffUser;
use tracing::info;
use uuid::Uuid;

use crate::kv::{load_json, save_json, KeyValueStore};
use crate::StoreError;

/// A logged-in staff member, bound to one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSession {
    pub session_id: Uuid,
    pub user: StaffUser,
    pub restaurant_id: u32,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StaffSession {
    pub fn new(user: StaffUser, restaurant_id: u32, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user,
            restaurant_id,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub fn session_key(session_id: &Uuid) -> String {
    format!("staffAuth:{}", session_id)
}

/// Session lifecycle: created on login or signup, cleared on logout.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn init(&self, session: &StaffSession) -> Result<(), StoreError> {
        let ttl = (session.expires_at - session.issued_at).num_seconds().max(1) as u64;
        save_json(self.kv.as_ref(), &session_key(&session.session_id), session, Some(ttl)).await?;
        info!(
            session_id = %session.session_id,
            restaurant_id = session.restaurant_id,
            "Staff session started"
        );
        Ok(())
    }

    /// The live session, or `None` when it is missing, unreadable or expired.
    /// An expired record is deleted.
    pub async fn load(&self, session_id: &Uuid, now: DateTime<Utc>) -> Result<Option<StaffSession>, StoreError> {
        let key = session_key(session_id);
        match load_json::<StaffSession>(self.kv.as_ref(), &key).await? {
            Some(session) if session.is_expired(now) => {
                self.kv.delete(&key).await?;
                info!(session_id = %session_id, "Expired staff session removed");
                Ok(None)
            }
            session => Ok(session),
        }
    }

    pub async fn clear(&self, session_id: &Uuid) -> Result<(), StoreError> {
        self.kv.delete(&session_key(session_id)).await?;
        info!(session_id = %session_id, "Staff session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKeyValueStore;

    fn user() -> StaffUser {
        StaffUser {
            name: "Staff Member".into(),
            email: "manager@bellavista.ae".into(),
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let sessions = SessionStore::new(kv.clone());
        let now = Utc::now();
        let session = StaffSession::new(user(), 1, Duration::hours(8), now);

        sessions.init(&session).await.unwrap();
        assert!(kv.get(&format!("staffAuth:{}", session.session_id)).await.unwrap().is_some());
        assert_eq!(sessions.load(&session.session_id, now).await.unwrap(), Some(session.clone()));

        sessions.clear(&session.session_id).await.unwrap();
        assert_eq!(sessions.load(&session.session_id, now).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let sessions = SessionStore::new(kv.clone());
        let now = Utc::now();
        let expired: Vec<StaffSession> = (0..100)
            .map(|_| StaffSession::new(user(), 1, Duration::minutes(5), now))
            .collect();
        for session in &expired {
            sessions.init(session).await.unwrap();
        }

        let later = now + Duration::hours(1);
        for session in &expired {
            assert_eq!(sessions.load(&session.session_id, later).await.unwrap(), None);
            assert!(kv.get(&session_key(&session.session_id)).await.unwrap().is_none());
        }
    }
}
