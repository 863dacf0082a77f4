//! PostgreSQL-backed `NotificationRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, ParseNotificationKindError, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    map_basic_pool_error(error, NotificationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_basic_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

/// Convert a database row into a domain notification.
fn row_to_notification(
    row: NotificationRow,
) -> Result<Notification, NotificationRepositoryError> {
    let NotificationRow {
        id,
        recipient_id,
        kind,
        exchange_id,
        body,
        read,
        created_at,
    } = row;

    let kind = kind
        .parse()
        .map_err(|err: ParseNotificationKindError| {
            NotificationRepositoryError::query(err.to_string())
        })?;

    Ok(Notification::from_parts(
        id,
        UserId::from_uuid(recipient_id),
        kind,
        exchange_id,
        body,
        read,
        created_at,
    ))
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewNotificationRow {
            id: notification.id(),
            recipient_id: *notification.recipient_id().as_uuid(),
            kind: notification.kind().as_str(),
            exchange_id: notification.exchange_id(),
            body: notification.body(),
            read: notification.is_read(),
            created_at: notification.created_at(),
        };

        diesel::insert_into(notifications::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::recipient_id.eq(recipient_id.as_uuid()))
            .order((
                notifications::read.asc(),
                notifications::created_at.desc(),
                notifications::id.desc(),
            ))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn mark_read(
        &self,
        notification_id: &Uuid,
        recipient_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = diesel::update(
            notifications::table.filter(
                notifications::id
                    .eq(notification_id)
                    .and(notifications::recipient_id.eq(recipient_id.as_uuid())),
            ),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::NotificationKind;

    #[rstest]
    fn row_conversion_accepts_canonical_kind_tokens() {
        let notification = row_to_notification(NotificationRow {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            kind: "oferta_recibida".to_owned(),
            exchange_id: Uuid::new_v4(),
            body: "Nueva oferta".to_owned(),
            read: false,
            created_at: Utc::now(),
        })
        .expect("valid row");

        assert_eq!(notification.kind(), NotificationKind::OfferReceived);
        assert!(!notification.is_read());
    }

    #[rstest]
    fn row_conversion_rejects_unknown_kind_tokens() {
        let error = row_to_notification(NotificationRow {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            kind: "promocion".to_owned(),
            exchange_id: Uuid::new_v4(),
            body: "Spam".to_owned(),
            read: false,
            created_at: Utc::now(),
        })
        .expect_err("unknown kind");
        assert!(matches!(error, NotificationRepositoryError::Query { .. }));
    }
}
