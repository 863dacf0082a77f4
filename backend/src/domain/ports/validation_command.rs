//! Driving port for submitting exchange validations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, ExchangeStatus, UserId, ValidationOutcome};

/// Request to submit a participant's verdict on an exchange.
#[derive(Debug, Clone)]
pub struct SubmitValidationRequest {
    pub caller: UserId,
    pub exchange_id: Uuid,
    /// Success flag (`exito`).
    pub verdict: bool,
    /// Optional score attached to the verdict (`puntuacion`).
    pub rating: Option<i16>,
    /// Optional comment (`comentario`).
    pub comment: Option<String>,
}

/// Resolution reported back to the submitting participant.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitValidationResponse {
    pub outcome: ValidationOutcome,
    pub status: ExchangeStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub validations_recorded: usize,
}

/// Driving port for the validation resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidationCommand: Send + Sync {
    /// Record the caller's verdict and resolve the exchange.
    async fn submit(
        &self,
        request: SubmitValidationRequest,
    ) -> Result<SubmitValidationResponse, Error>;
}

/// Fixture implementation always awaiting the second party.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureValidationCommand;

#[async_trait]
impl ValidationCommand for FixtureValidationCommand {
    async fn submit(
        &self,
        _request: SubmitValidationRequest,
    ) -> Result<SubmitValidationResponse, Error> {
        Ok(SubmitValidationResponse {
            outcome: ValidationOutcome::AwaitingSecond,
            status: ExchangeStatus::PendingValidation,
            completed_at: None,
            validations_recorded: 1,
        })
    }
}
