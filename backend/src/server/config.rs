//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::Duration;
use pawcare::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: Option<(String, Zeroizing<String>)>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, session_ttl: Duration) -> Self {
        Self {
            bind_addr,
            session_ttl,
            db_pool: None,
            admin: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one every port is served from process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Create or promote this administrator before serving.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<(String, Zeroizing<String>)>) -> Self {
        self.admin = admin;
        self
    }
}
