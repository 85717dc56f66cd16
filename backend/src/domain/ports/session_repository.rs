//! Port for bearer session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session repository adapters.
    pub enum SessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session repository query failed: {message}",
    }
}

/// A stored session. Only the token digest is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_digest: TokenDigest,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &SessionRecord) -> Result<(), SessionRepositoryError>;

    /// Look up a session by digest, expired or not.
    async fn find(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError>;

    /// Drop every session belonging to `user_id`.
    async fn revoke_for_user(&self, user_id: &UserId) -> Result<(), SessionRepositoryError>;

    /// Delete sessions that expired at or before `now`, returning how many
    /// were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError>;
}
