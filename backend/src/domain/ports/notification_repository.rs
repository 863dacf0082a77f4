//! Port for notification persistence.
//!
//! Notification writes are best-effort from the callers' point of view:
//! services log adapter failures and keep going. The port itself still
//! reports them so the read surface can distinguish failure from "no rows".

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Notification, UserId};

/// Errors raised by notification repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationRepositoryError {
    /// Repository connection could not be established.
    #[error("notification repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("notification repository query failed: {message}")]
    Query { message: String },
}

impl NotificationRepositoryError {
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

/// Port for writing and reading notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification row.
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError>;

    /// A recipient's notifications, unread first, newest first within each group.
    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Mark a notification read for its recipient. Returns `false` when no
    /// row matched the (id, recipient) pair.
    async fn mark_read(
        &self,
        notification_id: &Uuid,
        recipient_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert(
        &self,
        _notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        _recipient_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_read(
        &self,
        _notification_id: &Uuid,
        _recipient_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        Ok(true)
    }
}
