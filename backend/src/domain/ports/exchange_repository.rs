//! Port for exchange persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Exchange, ExchangeStatus, MeetingDetails, UserId};

/// Errors raised by exchange repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeRepositoryError {
    /// Repository connection could not be established.
    #[error("exchange repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("exchange repository query failed: {message}")]
    Query { message: String },
}

impl ExchangeRepositoryError {
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

/// A guarded status change: applied only while the row still holds one of
/// the expected statuses, so concurrent transitions lose cleanly instead of
/// overwriting each other.
#[derive(Debug, Clone)]
pub struct ExchangeStatusTransition {
    pub exchange_id: Uuid,
    pub expected: Vec<ExchangeStatus>,
    pub next: ExchangeStatus,
    pub meeting: Option<MeetingDetails>,
    pub reject_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeStatusTransition {
    /// Bare transition carrying no side fields.
    pub fn new(
        exchange_id: Uuid,
        expected: Vec<ExchangeStatus>,
        next: ExchangeStatus,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            exchange_id,
            expected,
            next,
            meeting: None,
            reject_reason: None,
            completed_at: None,
            updated_at,
        }
    }

    /// Attach meeting details recorded on accept.
    pub fn with_meeting(mut self, meeting: MeetingDetails) -> Self {
        self.meeting = Some(meeting);
        self
    }

    /// Attach the reason recorded on reject.
    pub fn with_reject_reason(mut self, reason: impl Into<String>) -> Self {
        self.reject_reason = Some(reason.into());
        self
    }
}

/// Port for writing and reading exchanges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRepository: Send + Sync {
    /// Persist a freshly proposed exchange.
    async fn insert(&self, exchange: &Exchange) -> Result<(), ExchangeRepositoryError>;

    /// Find an exchange by id.
    async fn find_by_id(
        &self,
        exchange_id: &Uuid,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError>;

    /// All exchanges where the user is proposer or receiver, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Exchange>, ExchangeRepositoryError>;

    /// Apply a compare-and-swap status transition.
    ///
    /// Returns `true` when a row matched the expected statuses and was
    /// updated, `false` when the guard missed.
    async fn transition_status(
        &self,
        transition: &ExchangeStatusTransition,
    ) -> Result<bool, ExchangeRepositoryError>;
}

/// Fixture implementation for tests that do not exercise exchange persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExchangeRepository;

#[async_trait]
impl ExchangeRepository for FixtureExchangeRepository {
    async fn insert(&self, _exchange: &Exchange) -> Result<(), ExchangeRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _exchange_id: &Uuid,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Exchange>, ExchangeRepositoryError> {
        Ok(Vec::new())
    }

    async fn transition_status(
        &self,
        _transition: &ExchangeStatusTransition,
    ) -> Result<bool, ExchangeRepositoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_find_returns_none() {
        let repo = FixtureExchangeRepository;
        let found = repo
            .find_by_id(&Uuid::new_v4())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    fn transition_builder_attaches_side_fields() {
        let transition = ExchangeStatusTransition::new(
            Uuid::new_v4(),
            vec![ExchangeStatus::Pending],
            ExchangeStatus::Rejected,
            Utc::now(),
        )
        .with_reject_reason("No disponible esa semana");

        assert_eq!(transition.reject_reason.as_deref(), Some("No disponible esa semana"));
        assert!(transition.meeting.is_none());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = ExchangeRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
