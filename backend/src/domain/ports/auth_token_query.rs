//! Port resolving bearer tokens to authenticated users.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::UserId;

/// Bearer token accepted by [`FixtureAuthTokenQuery`].
pub const FIXTURE_BEARER_TOKEN: &str = "fixture-bearer-token";

/// User resolved by [`FixtureAuthTokenQuery`].
pub fn fixture_user_id() -> UserId {
    UserId::from_uuid(Uuid::from_u128(0x0001))
}

/// Errors raised by auth token adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthTokenQueryError {
    /// Repository connection could not be established.
    #[error("auth token lookup connection failed: {message}")]
    Connection { message: String },
    /// Query failed during execution.
    #[error("auth token lookup failed: {message}")]
    Query { message: String },
}

impl AuthTokenQueryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for resolving a bearer token to a user id.
///
/// Returns `None` for unknown or expired tokens; adapters never surface the
/// token value in errors or logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenQuery: Send + Sync {
    /// Resolve the bearer token presented by a request.
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, AuthTokenQueryError>;
}

/// Fixture implementation resolving only [`FIXTURE_BEARER_TOKEN`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthTokenQuery;

#[async_trait]
impl AuthTokenQuery for FixtureAuthTokenQuery {
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, AuthTokenQueryError> {
        if token == FIXTURE_BEARER_TOKEN {
            Ok(Some(fixture_user_id()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_resolves_known_token() {
        let resolved = FixtureAuthTokenQuery
            .user_for_token(FIXTURE_BEARER_TOKEN)
            .await
            .expect("fixture lookup succeeds");
        assert_eq!(resolved, Some(fixture_user_id()));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_rejects_unknown_token() {
        let resolved = FixtureAuthTokenQuery
            .user_for_token("stolen-token")
            .await
            .expect("fixture lookup succeeds");
        assert!(resolved.is_none());
    }
}
