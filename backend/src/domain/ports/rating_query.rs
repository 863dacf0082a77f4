//! Driving port for reading a user's received ratings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, Rating, UserId};

/// Transport-neutral projection of a [`Rating`].
#[derive(Debug, Clone, PartialEq)]
pub struct RatingPayload {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub rater_id: UserId,
    pub rated_id: UserId,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Rating> for RatingPayload {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id(),
            exchange_id: rating.exchange_id(),
            rater_id: *rating.rater_id(),
            rated_id: *rating.rated_id(),
            score: rating.score().value(),
            comment: rating.comment().map(str::to_owned),
            created_at: rating.created_at(),
        }
    }
}

/// Request to read the ratings a user has received.
#[derive(Debug, Clone)]
pub struct ListRatingsForUserRequest {
    pub rated_id: UserId,
}

/// Driving port for rating reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingQuery: Send + Sync {
    /// Ratings received by a user, newest first.
    async fn list_for_user(
        &self,
        request: ListRatingsForUserRequest,
    ) -> Result<Vec<RatingPayload>, Error>;
}

pub(crate) fn fixture_rating_payload(rating_id: Uuid, rated_id: UserId) -> RatingPayload {
    RatingPayload {
        id: rating_id,
        exchange_id: Uuid::from_u128(0x0201),
        rater_id: UserId::from_uuid(Uuid::from_u128(0x0003)),
        rated_id,
        score: 5,
        comment: Some("Excelente trato".to_owned()),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Fixture implementation returning one canned rating.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRatingQuery;

#[async_trait]
impl RatingQuery for FixtureRatingQuery {
    async fn list_for_user(
        &self,
        request: ListRatingsForUserRequest,
    ) -> Result<Vec<RatingPayload>, Error> {
        Ok(vec![fixture_rating_payload(
            Uuid::from_u128(0x0401),
            request.rated_id,
        )])
    }
}
