//! Bearer token parsing used by the session extractor.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! header parsing here.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};

use crate::domain::{Error, SessionToken};

pub(crate) const NO_TOKEN: &str = "Not authorized, no token";
pub(crate) const TOKEN_FAILED: &str = "Not authorized, token failed";

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from the `Authorization` header.
///
/// A missing header or a non-bearer scheme is treated as "no token"; a
/// bearer header whose value is unreadable or blank fails token validation.
pub fn bearer_token(headers: &HeaderMap) -> Result<SessionToken, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(Error::unauthorized(NO_TOKEN));
    };
    let raw = value
        .to_str()
        .map_err(|_| Error::unauthorized(TOKEN_FAILED))?;
    let Some(token) = raw.strip_prefix(BEARER_PREFIX) else {
        return Err(Error::unauthorized(NO_TOKEN));
    };
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized(TOKEN_FAILED));
    }
    Ok(SessionToken::from_presented(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::header::HeaderValue;
    use rstest::rstest;

    fn headers(value: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = value {
            map.insert(AUTHORIZATION, HeaderValue::from_static(value));
        }
        map
    }

    #[rstest]
    fn bearer_token_is_extracted() {
        let token = bearer_token(&headers(Some("Bearer abc123"))).expect("token");
        assert_eq!(token.expose(), "abc123");
    }

    #[rstest]
    #[case(None, NO_TOKEN)]
    #[case(Some("Basic dXNlcjpwdw=="), NO_TOKEN)]
    #[case(Some("Bearer    "), TOKEN_FAILED)]
    fn missing_or_malformed_tokens_are_unauthorised(
        #[case] header: Option<&'static str>,
        #[case] message: &str,
    ) {
        let err = bearer_token(&headers(header)).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }
}
