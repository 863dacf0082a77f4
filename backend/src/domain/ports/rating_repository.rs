//! Port for rating persistence.

use async_trait::async_trait;

use crate::domain::{Rating, UserId};

/// Errors raised by rating repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingRepositoryError {
    /// Repository connection could not be established.
    #[error("rating repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("rating repository query failed: {message}")]
    Query { message: String },
    /// The rater already rated this exchange.
    #[error("participant already rated this exchange")]
    Duplicate,
}

impl RatingRepositoryError {
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

/// Port for writing ratings and reading a user's received ratings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Persist a rating. The unique (exchange, rater) index yields
    /// [`RatingRepositoryError::Duplicate`].
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError>;

    /// Ratings received by a user, newest first.
    async fn list_for_rated(
        &self,
        rated_id: &UserId,
    ) -> Result<Vec<Rating>, RatingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise rating persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRatingRepository;

#[async_trait]
impl RatingRepository for FixtureRatingRepository {
    async fn insert(&self, _rating: &Rating) -> Result<(), RatingRepositoryError> {
        Ok(())
    }

    async fn list_for_rated(
        &self,
        _rated_id: &UserId,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        Ok(Vec::new())
    }
}
