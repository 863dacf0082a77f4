//! Driving port for notification reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, Notification, NotificationKind, UserId};

/// Transport-neutral projection of a [`Notification`].
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    pub id: Uuid,
    pub recipient_id: UserId,
    pub kind: NotificationKind,
    pub exchange_id: Uuid,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationPayload {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id(),
            recipient_id: *notification.recipient_id(),
            kind: notification.kind(),
            exchange_id: notification.exchange_id(),
            body: notification.body().to_owned(),
            read: notification.is_read(),
            created_at: notification.created_at(),
        }
    }
}

/// Request to list the caller's notifications.
#[derive(Debug, Clone)]
pub struct ListNotificationsRequest {
    pub caller: UserId,
}

/// Driving port for notification reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// The caller's notifications, unread first.
    async fn list(
        &self,
        request: ListNotificationsRequest,
    ) -> Result<Vec<NotificationPayload>, Error>;
}

/// Fixture implementation returning no notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationQuery;

#[async_trait]
impl NotificationQuery for FixtureNotificationQuery {
    async fn list(
        &self,
        _request: ListNotificationsRequest,
    ) -> Result<Vec<NotificationPayload>, Error> {
        Ok(Vec::new())
    }
}
