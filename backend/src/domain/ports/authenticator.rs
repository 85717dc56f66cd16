//! Driving port resolving bearer tokens into callers.
//!
//! The admin flag is read from the current user record on every call, so a
//! demotion takes effect on the next request.

use async_trait::async_trait;

use crate::domain::{Caller, Error, SessionToken};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve a presented token. Unknown, expired or orphaned tokens fail
    /// with an unauthorized error.
    async fn authenticate(&self, token: &SessionToken) -> Result<Caller, Error>;
}
