//! Bearer-token authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by
//! concentrating credential extraction here. The extractor only parses the
//! `Authorization` header; resolving the token to a user id goes through the
//! [`AuthTokenQuery`](crate::domain::ports::AuthTokenQuery) port held in
//! [`HttpState`](crate::inbound::http::state::HttpState).

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

use super::ApiResult;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw bearer token presented by a request.
///
/// Extraction fails with `401 Unauthorized` when the `Authorization` header
/// is absent, not UTF-8, or not a `Bearer` credential.
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    /// Borrow the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_bearer(req: &HttpRequest) -> ApiResult<BearerToken> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing Authorization header"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed Authorization header"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| Error::unauthorized("Authorization header must be a Bearer token"))?;
    if token.trim().is_empty() {
        return Err(Error::unauthorized("empty bearer token"));
    }
    Ok(BearerToken(token.to_owned()))
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<ApiResult<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_bearer(req))
    }
}

/// Resolve the caller behind a bearer token, or fail with `401`.
pub async fn authenticate(state: &HttpState, token: &BearerToken) -> ApiResult<UserId> {
    let resolved = state
        .auth
        .user_for_token(token.as_str())
        .await
        .map_err(|err| Error::service_unavailable(format!("auth lookup failed: {err}")))?;
    resolved.ok_or_else(|| Error::unauthorized("invalid or expired bearer token"))
}
