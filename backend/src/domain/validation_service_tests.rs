//! Tests for the validation resolver service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockExchangeRepository, MockNotificationRepository, MockValidationRepository,
    ValidationResolution,
};
use crate::domain::{ErrorCode, ExchangeDraft, ExchangeStatus};

fn exchange_between(
    proposer: UserId,
    receiver: UserId,
    status: ExchangeStatus,
) -> Exchange {
    let now = Utc::now();
    Exchange::new(ExchangeDraft {
        id: Uuid::new_v4(),
        listing_id: Uuid::new_v4(),
        proposer_id: proposer,
        receiver_id: receiver,
        status,
        message: None,
        meeting: None,
        reject_reason: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    })
    .expect("valid exchange")
}

fn submit_request(caller: UserId, exchange_id: Uuid, verdict: bool) -> SubmitValidationRequest {
    SubmitValidationRequest {
        caller,
        exchange_id,
        verdict,
        rating: None,
        comment: None,
    }
}

fn service(
    exchanges: MockExchangeRepository,
    validations: MockValidationRepository,
    notifications: MockNotificationRepository,
) -> ValidationService<MockExchangeRepository, MockValidationRepository, MockNotificationRepository>
{
    ValidationService::new(
        Arc::new(exchanges),
        Arc::new(validations),
        Arc::new(notifications),
    )
}

fn resolution_for(
    validation: &Validation,
    outcome: ValidationOutcome,
) -> ValidationResolution {
    let completed_at = outcome.marks_completion().then(Utc::now);
    ValidationResolution {
        validations: vec![validation.clone()],
        outcome,
        status: outcome.status(),
        completed_at,
    }
}

#[tokio::test]
async fn first_verdict_moves_exchange_to_pending_validation() {
    let participant = UserId::random();
    let exchange = exchange_between(participant, UserId::random(), ExchangeStatus::InProgress);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations
        .expect_record_and_resolve()
        .times(1)
        .withf(move |validation| {
            validation.exchange_id() == exchange_id && validation.verdict()
        })
        .returning(|validation| Ok(resolution_for(validation, ValidationOutcome::AwaitingSecond)));

    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().times(1).return_once(|_| Ok(()));

    let response = service(exchanges, validations, notifications)
        .submit(submit_request(participant, exchange_id, true))
        .await
        .expect("submit succeeds");

    assert_eq!(response.outcome, ValidationOutcome::AwaitingSecond);
    assert_eq!(response.status, ExchangeStatus::PendingValidation);
    assert_eq!(response.validations_recorded, 1);
    assert!(response.completed_at.is_none());
}

#[tokio::test]
async fn agreeing_success_verdicts_complete_the_exchange() {
    let participant = UserId::random();
    let exchange =
        exchange_between(UserId::random(), participant, ExchangeStatus::PendingValidation);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations
        .expect_record_and_resolve()
        .times(1)
        .returning(|validation| Ok(resolution_for(validation, ValidationOutcome::Completed)));

    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().times(1).return_once(|_| Ok(()));

    let response = service(exchanges, validations, notifications)
        .submit(submit_request(participant, exchange_id, true))
        .await
        .expect("submit succeeds");

    assert_eq!(response.outcome, ValidationOutcome::Completed);
    assert_eq!(response.status, ExchangeStatus::Completed);
    assert!(response.completed_at.is_some());
}

#[tokio::test]
async fn non_participant_is_forbidden_and_nothing_is_written() {
    let exchange =
        exchange_between(UserId::random(), UserId::random(), ExchangeStatus::InProgress);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations.expect_record_and_resolve().times(0);

    let error = service(exchanges, validations, MockNotificationRepository::new())
        .submit(submit_request(UserId::random(), exchange_id, true))
        .await
        .expect_err("stranger cannot validate");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn submitting_outside_validation_window_is_invalid_state() {
    let participant = UserId::random();
    let exchange = exchange_between(participant, UserId::random(), ExchangeStatus::Accepted);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations.expect_record_and_resolve().times(0);

    let error = service(exchanges, validations, MockNotificationRepository::new())
        .submit(submit_request(participant, exchange_id, true))
        .await
        .expect_err("aceptado does not accept validations");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn duplicate_verdict_maps_to_duplicate_validation() {
    let participant = UserId::random();
    let exchange =
        exchange_between(participant, UserId::random(), ExchangeStatus::PendingValidation);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations
        .expect_record_and_resolve()
        .times(1)
        .return_once(|_| Err(ValidationRepositoryError::Duplicate));

    let error = service(exchanges, validations, MockNotificationRepository::new())
        .submit(submit_request(participant, exchange_id, false))
        .await
        .expect_err("second verdict");

    assert_eq!(error.code(), ErrorCode::DuplicateValidation);
}

#[tokio::test]
async fn out_of_range_score_is_rejected_before_any_write() {
    let participant = UserId::random();
    let exchange = exchange_between(participant, UserId::random(), ExchangeStatus::InProgress);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations.expect_record_and_resolve().times(0);

    let error = service(exchanges, validations, MockNotificationRepository::new())
        .submit(SubmitValidationRequest {
            caller: participant,
            exchange_id,
            verdict: true,
            rating: Some(9),
            comment: None,
        })
        .await
        .expect_err("score out of range");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn unknown_exchange_is_not_found() {
    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service(
        exchanges,
        MockValidationRepository::new(),
        MockNotificationRepository::new(),
    )
    .submit(submit_request(UserId::random(), Uuid::new_v4(), true))
    .await
    .expect_err("missing exchange");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn transactional_state_recheck_surfaces_as_invalid_state() {
    let participant = UserId::random();
    let exchange = exchange_between(participant, UserId::random(), ExchangeStatus::InProgress);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations
        .expect_record_and_resolve()
        .times(1)
        .return_once(|_| {
            Err(ValidationRepositoryError::InvalidState {
                status: ExchangeStatus::Cancelled,
            })
        });

    let error = service(exchanges, validations, MockNotificationRepository::new())
        .submit(submit_request(participant, exchange_id, true))
        .await
        .expect_err("cancelled concurrently");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn notification_failure_does_not_fail_submission() {
    let participant = UserId::random();
    let exchange = exchange_between(participant, UserId::random(), ExchangeStatus::InProgress);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut validations = MockValidationRepository::new();
    validations
        .expect_record_and_resolve()
        .times(1)
        .returning(|validation| Ok(resolution_for(validation, ValidationOutcome::Failed)));

    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().times(1).return_once(|_| {
        Err(crate::domain::ports::NotificationRepositoryError::connection(
            "pool exhausted",
        ))
    });

    let response = service(exchanges, validations, notifications)
        .submit(submit_request(participant, exchange_id, false))
        .await
        .expect("submit still succeeds");

    assert_eq!(response.status, ExchangeStatus::Failed);
}
