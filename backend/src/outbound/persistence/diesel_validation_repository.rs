//! PostgreSQL-backed `ValidationRepository` implementation using Diesel.
//!
//! `record_and_resolve` is a single SERIALIZABLE transaction: re-check the
//! exchange status, insert the verdict, re-read the validation set, derive
//! the next status via the pure resolution rule, and persist it. Two
//! concurrent "first" submissions therefore serialize instead of both
//! observing one row and dropping a status change. The unique
//! (exchange_id, user_id) index turns a second verdict from the same
//! participant into [`ValidationRepositoryError::Duplicate`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    ValidationRepository, ValidationRepositoryError, ValidationResolution,
};
use crate::domain::{
    ExchangeStatus, Score, UserId, Validation, ValidationDraft, resolve_validations,
};

use super::diesel_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewValidationRow, ValidationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{exchanges, validations};

/// Diesel-backed implementation of the validation repository port.
#[derive(Clone)]
pub struct DieselValidationRepository {
    pool: DbPool,
}

impl DieselValidationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ValidationRepositoryError {
    map_basic_pool_error(error, ValidationRepositoryError::connection)
}

impl From<diesel::result::Error> for ValidationRepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        if is_unique_violation(&error) {
            return Self::Duplicate;
        }
        map_basic_diesel_error(
            error,
            ValidationRepositoryError::query,
            ValidationRepositoryError::connection,
        )
    }
}

/// Convert a database row into a validated domain validation.
fn row_to_validation(row: ValidationRow) -> Result<Validation, ValidationRepositoryError> {
    let ValidationRow {
        id,
        exchange_id,
        user_id,
        exito,
        puntuacion,
        comentario,
        created_at,
    } = row;

    let rating = puntuacion
        .map(Score::try_new)
        .transpose()
        .map_err(|err| ValidationRepositoryError::query(err.to_string()))?;

    Validation::new(ValidationDraft {
        id,
        exchange_id,
        user_id: UserId::from_uuid(user_id),
        verdict: exito,
        rating,
        comment: comentario,
        created_at,
    })
    .map_err(|err| ValidationRepositoryError::query(err.to_string()))
}

fn parse_status(token: &str) -> Result<ExchangeStatus, ValidationRepositoryError> {
    token
        .parse()
        .map_err(|err: crate::domain::ParseExchangeStatusError| {
            ValidationRepositoryError::query(err.to_string())
        })
}

async fn resolve_in_transaction(
    conn: &mut AsyncPgConnection,
    validation: &Validation,
) -> Result<ValidationResolution, ValidationRepositoryError> {
    let exchange_id = validation.exchange_id();

    let status_token: Option<String> = exchanges::table
        .filter(exchanges::id.eq(exchange_id))
        .select(exchanges::status)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(status_token) = status_token else {
        return Err(ValidationRepositoryError::ExchangeMissing);
    };
    let current = parse_status(&status_token)?;
    if !current.accepts_validation() {
        return Err(ValidationRepositoryError::InvalidState { status: current });
    }

    let new_row = NewValidationRow {
        id: validation.id(),
        exchange_id,
        user_id: *validation.user_id().as_uuid(),
        exito: validation.verdict(),
        puntuacion: validation.rating().map(Score::value),
        comentario: validation.comment(),
        created_at: validation.created_at(),
    };
    diesel::insert_into(validations::table)
        .values(&new_row)
        .execute(conn)
        .await?;

    let rows: Vec<ValidationRow> = validations::table
        .filter(validations::exchange_id.eq(exchange_id))
        .order((validations::created_at.asc(), validations::id.asc()))
        .select(ValidationRow::as_select())
        .load(conn)
        .await?;
    let recorded: Vec<Validation> = rows
        .into_iter()
        .map(row_to_validation)
        .collect::<Result<_, _>>()?;

    let outcome = resolve_validations(&recorded)
        .map_err(|err| ValidationRepositoryError::query(err.to_string()))?;
    let next = outcome.status();
    let now = Utc::now();
    let completed_at = outcome.marks_completion().then_some(now);

    if let Some(done) = completed_at {
        diesel::update(exchanges::table.filter(exchanges::id.eq(exchange_id)))
            .set((
                exchanges::status.eq(next.as_str()),
                exchanges::fecha_completado.eq(done),
                exchanges::updated_at.eq(now),
            ))
            .execute(conn)
            .await?;
    } else {
        diesel::update(exchanges::table.filter(exchanges::id.eq(exchange_id)))
            .set((
                exchanges::status.eq(next.as_str()),
                exchanges::updated_at.eq(now),
            ))
            .execute(conn)
            .await?;
    }

    Ok(ValidationResolution {
        validations: recorded,
        outcome,
        status: next,
        completed_at,
    })
}

#[async_trait]
impl ValidationRepository for DieselValidationRepository {
    async fn record_and_resolve(
        &self,
        validation: &Validation,
    ) -> Result<ValidationResolution, ValidationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.build_transaction()
            .serializable()
            .run(|conn| resolve_in_transaction(conn, validation).scope_boxed())
            .await
    }

    async fn list_for_exchange(
        &self,
        exchange_id: &Uuid,
    ) -> Result<Vec<Validation>, ValidationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ValidationRow> = validations::table
            .filter(validations::exchange_id.eq(exchange_id))
            .order((validations::created_at.asc(), validations::id.asc()))
            .select(ValidationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(ValidationRepositoryError::from)?;

        rows.into_iter().map(row_to_validation).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> ValidationRow {
        ValidationRow {
            id: Uuid::new_v4(),
            exchange_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exito: true,
            puntuacion: Some(4),
            comentario: Some("Todo bien".to_owned()),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_conversion_accepts_valid_rows(valid_row: ValidationRow) {
        let validation = row_to_validation(valid_row).expect("valid row");
        assert!(validation.verdict());
        assert_eq!(validation.rating().map(Score::value), Some(4));
    }

    #[rstest]
    fn row_conversion_rejects_out_of_range_scores(mut valid_row: ValidationRow) {
        valid_row.puntuacion = Some(11);
        let error = row_to_validation(valid_row).expect_err("bad score");
        assert!(matches!(error, ValidationRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unique_violations_map_to_duplicate() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(
            ValidationRepositoryError::from(diesel_err),
            ValidationRepositoryError::Duplicate
        );
    }

    #[rstest]
    fn unknown_status_tokens_are_query_errors() {
        let error = parse_status("esperando").expect_err("unknown token");
        assert!(matches!(error, ValidationRepositoryError::Query { .. }));
    }
}
