//! Notification domain service and the best-effort dispatch helper.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::Error;
use crate::domain::Notification;
use crate::domain::ports::{
    ListNotificationsRequest, MarkNotificationReadRequest, NotificationCommand,
    NotificationPayload, NotificationQuery, NotificationRepository, NotificationRepositoryError,
};

/// Insert a notification row, logging instead of propagating failures.
///
/// Notification dispatch is a collaborator concern of the exchange flows:
/// a failed insert must never fail the state transition that triggered it.
pub(crate) async fn notify_best_effort<N>(repo: &N, notification: Notification)
where
    N: NotificationRepository + ?Sized,
{
    if let Err(error) = repo.insert(&notification).await {
        warn!(
            recipient = %notification.recipient_id(),
            kind = %notification.kind(),
            exchange_id = %notification.exchange_id(),
            %error,
            "notification insert failed; continuing"
        );
    }
}

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

/// Notification service implementing the read and mark-read driving ports.
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    /// Create a new service with the notification repository.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationQuery for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(
        &self,
        request: ListNotificationsRequest,
    ) -> Result<Vec<NotificationPayload>, Error> {
        let notifications = self
            .notifications
            .list_for_recipient(&request.caller)
            .await
            .map_err(map_repository_error)?;

        Ok(notifications
            .into_iter()
            .map(NotificationPayload::from)
            .collect())
    }
}

#[async_trait]
impl<N> NotificationCommand for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn mark_read(&self, request: MarkNotificationReadRequest) -> Result<(), Error> {
        let marked = self
            .notifications
            .mark_read(&request.notification_id, &request.caller)
            .await
            .map_err(map_repository_error)?;

        if marked {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "notification {} not found",
                request.notification_id
            )))
        }
    }
}
