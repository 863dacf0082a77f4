//! Validation resolver domain service.
//!
//! Checks that the caller may validate the exchange, records the verdict
//! through the atomic repository operation, and reports the resolution back.
//! The repository re-checks state and uniqueness inside its transaction, so
//! the pre-checks here only shape error messages for the common cases; the
//! transaction is the authority under concurrency.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::notification_service::notify_best_effort;
use crate::domain::ports::{
    ExchangeRepository, ExchangeRepositoryError, NotificationRepository, SubmitValidationRequest,
    SubmitValidationResponse, ValidationCommand, ValidationRepository, ValidationRepositoryError,
};
use crate::domain::{
    Error, Exchange, Notification, NotificationKind, Score, UserId, Validation, ValidationDraft,
    ValidationOutcome,
};

fn map_exchange_repository_error(error: ExchangeRepositoryError) -> Error {
    match error {
        ExchangeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("exchange repository unavailable: {message}"))
        }
        ExchangeRepositoryError::Query { message } => {
            Error::internal(format!("exchange repository error: {message}"))
        }
    }
}

fn map_validation_repository_error(error: ValidationRepositoryError) -> Error {
    match error {
        ValidationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("validation repository unavailable: {message}"))
        }
        ValidationRepositoryError::Query { message } => {
            Error::internal(format!("validation repository error: {message}"))
        }
        ValidationRepositoryError::Duplicate => Error::duplicate_validation(
            "participant already submitted a validation for this exchange",
        ),
        ValidationRepositoryError::InvalidState { status } => Error::invalid_state(format!(
            "exchange in status {status} does not accept validations"
        )),
        ValidationRepositoryError::ExchangeMissing => Error::not_found("exchange not found"),
    }
}

fn notification_kind_for(outcome: ValidationOutcome) -> NotificationKind {
    match outcome {
        ValidationOutcome::Completed => NotificationKind::ExchangeCompleted,
        ValidationOutcome::Failed => NotificationKind::ExchangeFailed,
        ValidationOutcome::AwaitingSecond | ValidationOutcome::Disputed => {
            NotificationKind::ValidationRecorded
        }
    }
}

fn notification_body_for(outcome: ValidationOutcome) -> &'static str {
    match outcome {
        ValidationOutcome::AwaitingSecond => "Tu contraparte valido el intercambio",
        ValidationOutcome::Completed => "El intercambio fue completado",
        ValidationOutcome::Failed => "El intercambio fue marcado como fallido",
        ValidationOutcome::Disputed => "Las validaciones no coinciden; intercambio en revision",
    }
}

/// Validation resolver implementing the submit driving port.
#[derive(Clone)]
pub struct ValidationService<E, V, N> {
    exchanges: Arc<E>,
    validations: Arc<V>,
    notifications: Arc<N>,
}

impl<E, V, N> ValidationService<E, V, N> {
    /// Create a new service with its repositories.
    pub fn new(exchanges: Arc<E>, validations: Arc<V>, notifications: Arc<N>) -> Self {
        Self {
            exchanges,
            validations,
            notifications,
        }
    }
}

impl<E, V, N> ValidationService<E, V, N>
where
    E: ExchangeRepository,
    V: ValidationRepository,
    N: NotificationRepository,
{
    async fn load_exchange(&self, exchange_id: &Uuid) -> Result<Exchange, Error> {
        self.exchanges
            .find_by_id(exchange_id)
            .await
            .map_err(map_exchange_repository_error)?
            .ok_or_else(|| Error::not_found(format!("exchange {exchange_id} not found")))
    }

    fn build_validation(
        request: &SubmitValidationRequest,
    ) -> Result<Validation, Error> {
        let rating = request
            .rating
            .map(Score::try_new)
            .transpose()
            .map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": "puntuacion",
                    "code": "out_of_range",
                }))
            })?;

        Validation::new(ValidationDraft {
            id: Uuid::new_v4(),
            exchange_id: request.exchange_id,
            user_id: request.caller,
            verdict: request.verdict,
            rating,
            comment: request.comment.clone(),
            created_at: Utc::now(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn notify_counterparty(
        &self,
        exchange: &Exchange,
        caller: &UserId,
        outcome: ValidationOutcome,
    ) {
        let Some(counterparty) = exchange.counterparty(caller) else {
            return;
        };
        let notification = Notification::new(
            *counterparty,
            notification_kind_for(outcome),
            exchange.id(),
            notification_body_for(outcome),
            Utc::now(),
        );
        notify_best_effort(self.notifications.as_ref(), notification).await;
    }
}

#[async_trait]
impl<E, V, N> ValidationCommand for ValidationService<E, V, N>
where
    E: ExchangeRepository,
    V: ValidationRepository,
    N: NotificationRepository,
{
    async fn submit(
        &self,
        request: SubmitValidationRequest,
    ) -> Result<SubmitValidationResponse, Error> {
        let exchange = self.load_exchange(&request.exchange_id).await?;

        if !exchange.is_participant(&request.caller) {
            return Err(Error::forbidden(
                "only participants may validate an exchange",
            ));
        }
        if !exchange.status().accepts_validation() {
            return Err(Error::invalid_state(format!(
                "exchange in status {} does not accept validations",
                exchange.status()
            )));
        }

        let validation = Self::build_validation(&request)?;
        let resolution = self
            .validations
            .record_and_resolve(&validation)
            .await
            .map_err(map_validation_repository_error)?;

        self.notify_counterparty(&exchange, &request.caller, resolution.outcome)
            .await;

        Ok(SubmitValidationResponse {
            outcome: resolution.outcome,
            status: resolution.status,
            completed_at: resolution.completed_at,
            validations_recorded: resolution.validations.len(),
        })
    }
}

#[cfg(test)]
#[path = "validation_service_tests.rs"]
mod tests;
