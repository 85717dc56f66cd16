//! In-memory `SessionRepository` keyed by token digest.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{SessionRecord, SessionRepository, SessionRepositoryError};
use crate::domain::{TokenDigest, UserId};

#[derive(Debug, Default)]
pub struct MemorySessionRepository {
    sessions: Mutex<HashMap<TokenDigest, SessionRecord>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, session: &SessionRecord) -> Result<(), SessionRepositoryError> {
        self.sessions
            .lock()
            .await
            .insert(session.token_digest.clone(), session.clone());
        Ok(())
    }

    async fn find(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        Ok(self.sessions.lock().await.get(digest).cloned())
    }

    async fn revoke_for_user(&self, user_id: &UserId) -> Result<(), SessionRepositoryError> {
        self.sessions
            .lock()
            .await
            .retain(|_, session| &session.user_id != user_id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionToken;
    use chrono::Duration;

    fn record(user_id: UserId, expires_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            token_digest: SessionToken::generate().digest(),
            user_id,
            expires_at,
        }
    }

    #[tokio::test]
    async fn revoking_removes_only_that_users_sessions() {
        let repo = MemorySessionRepository::new();
        let jane = UserId::random();
        let john = UserId::random();
        let janes = record(jane, Utc::now());
        let johns = record(john, Utc::now());
        repo.insert(&janes).await.expect("insert");
        repo.insert(&johns).await.expect("insert");

        repo.revoke_for_user(&jane).await.expect("revoke");

        assert!(repo.find(&janes.token_digest).await.expect("find").is_none());
        assert_eq!(
            repo.find(&johns.token_digest).await.expect("find"),
            Some(johns)
        );
    }

    #[tokio::test]
    async fn purging_drops_only_expired_sessions() {
        let repo = MemorySessionRepository::new();
        let now = Utc::now();
        let user_id = UserId::random();
        let stale = record(user_id, now - Duration::minutes(1));
        let boundary = record(user_id, now);
        let live = record(user_id, now + Duration::days(1));
        for session in [&stale, &boundary, &live] {
            repo.insert(session).await.expect("insert");
        }

        let purged = repo.purge_expired(now).await.expect("purge");

        assert_eq!(purged, 2);
        assert!(repo.find(&stale.token_digest).await.expect("find").is_none());
        assert!(repo.find(&boundary.token_digest).await.expect("find").is_none());
        assert_eq!(repo.find(&live.token_digest).await.expect("find"), Some(live));
    }
}
