//! PostgreSQL-backed `ExchangeRepository` implementation using Diesel.
//!
//! Status transitions are single `UPDATE ... WHERE status IN (...)`
//! statements; the row count tells the caller whether the guard matched.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    ExchangeRepository, ExchangeRepositoryError, ExchangeStatusTransition,
};
use crate::domain::{Exchange, ExchangeDraft, MeetingDetails, ParseExchangeStatusError, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ExchangeRow, NewExchangeRow};
use super::pool::{DbPool, PoolError};
use super::schema::exchanges;

/// Diesel-backed implementation of the exchange repository port.
#[derive(Clone)]
pub struct DieselExchangeRepository {
    pool: DbPool,
}

impl DieselExchangeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExchangeRepositoryError {
    map_basic_pool_error(error, ExchangeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExchangeRepositoryError {
    map_basic_diesel_error(
        error,
        ExchangeRepositoryError::query,
        ExchangeRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain exchange.
pub(crate) fn row_to_exchange(row: ExchangeRow) -> Result<Exchange, ExchangeRepositoryError> {
    let ExchangeRow {
        id,
        listing_id,
        proposer_id,
        receiver_id,
        status,
        message,
        meeting_location,
        meeting_at,
        meeting_notes,
        reject_reason,
        fecha_completado,
        created_at,
        updated_at,
    } = row;

    let status = status
        .parse()
        .map_err(|err: ParseExchangeStatusError| ExchangeRepositoryError::query(err.to_string()))?;

    let meeting = match (meeting_location, meeting_at) {
        (Some(location), Some(at)) => Some(
            MeetingDetails::new(location, at, meeting_notes)
                .map_err(|err| ExchangeRepositoryError::query(err.to_string()))?,
        ),
        _ => None,
    };

    Exchange::new(ExchangeDraft {
        id,
        listing_id,
        proposer_id: UserId::from_uuid(proposer_id),
        receiver_id: UserId::from_uuid(receiver_id),
        status,
        message,
        meeting,
        reject_reason,
        completed_at: fecha_completado,
        created_at,
        updated_at,
    })
    .map_err(|err| ExchangeRepositoryError::query(err.to_string()))
}

#[async_trait]
impl ExchangeRepository for DieselExchangeRepository {
    async fn insert(&self, exchange: &Exchange) -> Result<(), ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewExchangeRow {
            id: exchange.id(),
            listing_id: exchange.listing_id(),
            proposer_id: *exchange.proposer_id().as_uuid(),
            receiver_id: *exchange.receiver_id().as_uuid(),
            status: exchange.status().as_str(),
            message: exchange.message(),
            created_at: exchange.created_at(),
            updated_at: exchange.updated_at(),
        };

        diesel::insert_into(exchanges::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        exchange_id: &Uuid,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = exchanges::table
            .filter(exchanges::id.eq(exchange_id))
            .select(ExchangeRow::as_select())
            .first::<ExchangeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_exchange).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Exchange>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExchangeRow> = exchanges::table
            .filter(
                exchanges::proposer_id
                    .eq(user_id.as_uuid())
                    .or(exchanges::receiver_id.eq(user_id.as_uuid())),
            )
            .order((exchanges::created_at.desc(), exchanges::id.desc()))
            .select(ExchangeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_exchange).collect()
    }

    async fn transition_status(
        &self,
        transition: &ExchangeStatusTransition,
    ) -> Result<bool, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let expected: Vec<&'static str> = transition
            .expected
            .iter()
            .map(|status| status.as_str())
            .collect();
        let guard = exchanges::id
            .eq(transition.exchange_id)
            .and(exchanges::status.eq_any(expected));
        let base = (
            exchanges::status.eq(transition.next.as_str()),
            exchanges::updated_at.eq(transition.updated_at),
        );

        let rows = if let Some(meeting) = &transition.meeting {
            diesel::update(exchanges::table.filter(guard))
                .set((
                    base,
                    exchanges::meeting_location.eq(meeting.location()),
                    exchanges::meeting_at.eq(meeting.meeting_at()),
                    exchanges::meeting_notes.eq(meeting.notes()),
                ))
                .execute(&mut conn)
                .await
        } else if let Some(reason) = &transition.reject_reason {
            diesel::update(exchanges::table.filter(guard))
                .set((base, exchanges::reject_reason.eq(reason)))
                .execute(&mut conn)
                .await
        } else if let Some(completed_at) = transition.completed_at {
            diesel::update(exchanges::table.filter(guard))
                .set((base, exchanges::fecha_completado.eq(completed_at)))
                .execute(&mut conn)
                .await
        } else {
            diesel::update(exchanges::table.filter(guard))
                .set(base)
                .execute(&mut conn)
                .await
        }
        .map_err(map_diesel_error)?;

        Ok(rows > 0)
    }
}
