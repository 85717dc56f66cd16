//! Correlation identifier shared by logs, error bodies and the `trace-id`
//! response header.
//!
//! The active identifier sits in a tokio task-local, so [`Error`] values
//! built anywhere inside a request pick it up. Spawned tasks do not inherit
//! it; run them under [`TraceId::scope`] when they report errors.
//!
//! [`Error`]: crate::domain::Error

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Request and response header carrying the identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// UUID naming one request end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied identifier when it is a UUID, otherwise mint
    /// a fresh one.
    ///
    /// ```
    /// use pawcare::domain::TraceId;
    ///
    /// let nil = "00000000-0000-0000-0000-000000000000";
    /// assert_eq!(TraceId::from_header(Some(nil)).to_string(), nil);
    /// assert_ne!(TraceId::from_header(Some("junk")).to_string(), "junk");
    /// ```
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// The identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
