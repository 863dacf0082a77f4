//! PostgreSQL-backed `RatingRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RatingRepository, RatingRepositoryError};
use crate::domain::{Rating, RatingDraft, Score, UserId};

use super::diesel_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewRatingRow, RatingRow};
use super::pool::{DbPool, PoolError};
use super::schema::ratings;

/// Diesel-backed implementation of the rating repository port.
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RatingRepositoryError {
    map_basic_pool_error(error, RatingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RatingRepositoryError {
    if is_unique_violation(&error) {
        return RatingRepositoryError::Duplicate;
    }
    map_basic_diesel_error(
        error,
        RatingRepositoryError::query,
        RatingRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain rating.
fn row_to_rating(row: RatingRow) -> Result<Rating, RatingRepositoryError> {
    let RatingRow {
        id,
        exchange_id,
        rater_id,
        rated_id,
        puntuacion,
        comentario,
        created_at,
    } = row;

    let score =
        Score::try_new(puntuacion).map_err(|err| RatingRepositoryError::query(err.to_string()))?;

    Rating::new(RatingDraft {
        id,
        exchange_id,
        rater_id: UserId::from_uuid(rater_id),
        rated_id: UserId::from_uuid(rated_id),
        score,
        comment: comentario,
        created_at,
    })
    .map_err(|err| RatingRepositoryError::query(err.to_string()))
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewRatingRow {
            id: rating.id(),
            exchange_id: rating.exchange_id(),
            rater_id: *rating.rater_id().as_uuid(),
            rated_id: *rating.rated_id().as_uuid(),
            puntuacion: rating.score().value(),
            comentario: rating.comment(),
            created_at: rating.created_at(),
        };

        diesel::insert_into(ratings::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_rated(
        &self,
        rated_id: &UserId,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RatingRow> = ratings::table
            .filter(ratings::rated_id.eq(rated_id.as_uuid()))
            .order((ratings::created_at.desc(), ratings::id.desc()))
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_rating).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn unique_violations_map_to_duplicate() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(map_diesel_error(diesel_err), RatingRepositoryError::Duplicate);
    }

    #[rstest]
    fn row_conversion_rejects_self_ratings() {
        let user = Uuid::new_v4();
        let error = row_to_rating(RatingRow {
            id: Uuid::new_v4(),
            exchange_id: Uuid::new_v4(),
            rater_id: user,
            rated_id: user,
            puntuacion: 3,
            comentario: None,
            created_at: Utc::now(),
        })
        .expect_err("self rating");
        assert!(matches!(error, RatingRepositoryError::Query { .. }));
    }
}
