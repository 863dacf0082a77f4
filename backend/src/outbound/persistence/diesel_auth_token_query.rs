//! PostgreSQL-backed `AuthTokenQuery` implementation using Diesel.
//!
//! Tokens are stored as SHA-256 digests; the raw token never reaches the
//! database, logs, or error messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{AuthTokenQuery, AuthTokenQueryError};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::access_tokens;

/// Diesel-backed implementation of the auth token port.
#[derive(Clone)]
pub struct DieselAuthTokenQuery {
    pool: DbPool,
}

impl DieselAuthTokenQuery {
    /// Create a new adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenQueryError {
    map_basic_pool_error(error, AuthTokenQueryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AuthTokenQueryError {
    map_basic_diesel_error(
        error,
        AuthTokenQueryError::query,
        AuthTokenQueryError::connection,
    )
}

/// SHA-256 digest of the raw bearer token.
pub(crate) fn token_digest(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}

#[async_trait]
impl AuthTokenQuery for DieselAuthTokenQuery {
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, AuthTokenQueryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(Uuid, Option<DateTime<Utc>>)> = access_tokens::table
            .filter(access_tokens::token_digest.eq(token_digest(token)))
            .select((access_tokens::user_id, access_tokens::expires_at))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.and_then(|(user_id, expires_at)| {
            let expired = expires_at.is_some_and(|at| at <= Utc::now());
            (!expired).then(|| UserId::from_uuid(user_id))
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn digests_are_stable_and_token_free() {
        let digest = token_digest("secreto-123");
        assert_eq!(digest, token_digest("secreto-123"));
        assert_eq!(digest.len(), 32);
        assert_ne!(digest, token_digest("secreto-124"));
    }
}
