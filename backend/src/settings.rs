//! Server settings loaded via OrthoConfig.
//!
//! Values come from `PAWCARE_*` environment variables, command-line flags or
//! a configuration file. Every field is optional; accessors supply defaults.

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_TTL_DAYS: u32 = 30;

/// Failure turning raw settings into usable values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
    #[error("admin_email and admin_password must be set together")]
    PartialAdmin,
    #[error("session_ttl_days must be at least 1")]
    SessionTtl,
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAWCARE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Lifetime of issued bearer tokens, in days.
    pub session_ttl_days: Option<u32>,
    /// Administrator created or promoted at startup.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether to apply embedded migrations; on unless switched off.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    pub fn session_ttl(&self) -> Result<Duration, SettingsError> {
        match self.session_ttl_days.unwrap_or(DEFAULT_SESSION_TTL_DAYS) {
            0 => Err(SettingsError::SessionTtl),
            days => Ok(Duration::days(i64::from(days))),
        }
    }

    /// Bootstrap administrator credentials, when configured.
    pub fn admin_credentials(&self) -> Result<Option<(String, Zeroizing<String>)>, SettingsError> {
        let email = self.admin_email.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let password = self.admin_password.as_deref().filter(|v| !v.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok(Some((
                email.to_owned(),
                Zeroizing::new(password.to_owned()),
            ))),
            (None, None) => Ok(None),
            _ => Err(SettingsError::PartialAdmin),
        }
    }
}
