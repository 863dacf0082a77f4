//! Port for validation persistence and atomic resolution.
//!
//! The write path is deliberately a single operation: inserting a verdict and
//! deriving the exchange's next status must not be separable, or two
//! concurrent "first" submissions could each observe one row and drop a
//! status change. Adapters implement [`ValidationRepository::record_and_resolve`]
//! as one serializable transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ExchangeStatus, Validation, ValidationOutcome};

/// Errors raised by validation repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationRepositoryError {
    /// Repository connection could not be established.
    #[error("validation repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("validation repository query failed: {message}")]
    Query { message: String },
    /// The submitting user already holds a verdict for this exchange.
    #[error("participant already submitted a validation for this exchange")]
    Duplicate,
    /// The exchange no longer accepts validations.
    #[error("exchange status {status} does not accept validations")]
    InvalidState { status: ExchangeStatus },
    /// The owning exchange does not exist.
    #[error("exchange not found")]
    ExchangeMissing,
}

impl ValidationRepositoryError {
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

/// Result of atomically recording a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResolution {
    /// The exchange's full validation set after the write.
    pub validations: Vec<Validation>,
    /// Outcome derived from the set.
    pub outcome: ValidationOutcome,
    /// Status persisted on the exchange row.
    pub status: ExchangeStatus,
    /// `fecha_completado` when the outcome completed the exchange.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Port for writing validations and resolving the owning exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidationRepository: Send + Sync {
    /// Atomically insert the verdict, re-read the exchange's validation set,
    /// derive the next status via the resolution rule, and persist it.
    ///
    /// The whole sequence runs in one serializable transaction which
    /// re-checks that the exchange still accepts validations; the unique
    /// (exchange, user) index yields [`ValidationRepositoryError::Duplicate`].
    async fn record_and_resolve(
        &self,
        validation: &Validation,
    ) -> Result<ValidationResolution, ValidationRepositoryError>;

    /// Read the validation set for an exchange, oldest first.
    async fn list_for_exchange(
        &self,
        exchange_id: &Uuid,
    ) -> Result<Vec<Validation>, ValidationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise validation persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureValidationRepository;

#[async_trait]
impl ValidationRepository for FixtureValidationRepository {
    async fn record_and_resolve(
        &self,
        validation: &Validation,
    ) -> Result<ValidationResolution, ValidationRepositoryError> {
        Ok(ValidationResolution {
            validations: vec![validation.clone()],
            outcome: ValidationOutcome::AwaitingSecond,
            status: ExchangeStatus::PendingValidation,
            completed_at: None,
        })
    }

    async fn list_for_exchange(
        &self,
        _exchange_id: &Uuid,
    ) -> Result<Vec<Validation>, ValidationRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{UserId, ValidationDraft};

    #[rstest]
    #[tokio::test]
    async fn fixture_records_an_awaiting_resolution() {
        let validation = Validation::new(ValidationDraft {
            id: Uuid::new_v4(),
            exchange_id: Uuid::new_v4(),
            user_id: UserId::random(),
            verdict: true,
            rating: None,
            comment: None,
            created_at: Utc::now(),
        })
        .expect("valid validation");

        let resolution = FixtureValidationRepository
            .record_and_resolve(&validation)
            .await
            .expect("fixture resolution succeeds");

        assert_eq!(resolution.outcome, ValidationOutcome::AwaitingSecond);
        assert_eq!(resolution.status, ExchangeStatus::PendingValidation);
        assert_eq!(resolution.validations.len(), 1);
    }

    #[rstest]
    fn invalid_state_error_names_the_status() {
        let err = ValidationRepositoryError::InvalidState {
            status: ExchangeStatus::Completed,
        };
        assert!(err.to_string().contains("completado"));
    }
}
