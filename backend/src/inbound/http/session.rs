//! Caller extraction to keep HTTP handlers free of authentication plumbing.
//!
//! Handlers that take a [`SessionContext`] only run once the bearer token has
//! been resolved into a [`Caller`]; everything else is rejected with 401.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Caller, Error, UserId};
use crate::inbound::http::auth::bearer_token;
use crate::inbound::http::state::HttpState;

/// Authenticated caller resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext(Caller);

impl SessionContext {
    /// Identity and capabilities of the caller.
    pub fn caller(&self) -> &Caller {
        &self.0
    }

    pub fn user_id(&self) -> UserId {
        self.0.user_id()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state missing from application"))?;
            let caller = state.authenticator.authenticate(&token).await?;
            Ok(SessionContext(caller))
        })
    }
}
