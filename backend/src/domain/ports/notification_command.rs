//! Driving port for notification mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Request to mark one of the caller's notifications as read.
#[derive(Debug, Clone)]
pub struct MarkNotificationReadRequest {
    pub caller: UserId,
    pub notification_id: Uuid,
}

/// Driving port for notification mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark a notification read; recipient-only.
    async fn mark_read(&self, request: MarkNotificationReadRequest) -> Result<(), Error>;
}

/// Fixture implementation accepting every mark-read request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationCommand;

#[async_trait]
impl NotificationCommand for FixtureNotificationCommand {
    async fn mark_read(&self, _request: MarkNotificationReadRequest) -> Result<(), Error> {
        Ok(())
    }
}
