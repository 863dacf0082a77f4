//! Tests for the rating service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockExchangeRepository, MockRatingRepository};
use crate::domain::{ErrorCode, ExchangeDraft, UserId};

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

fn rate_request(
    caller: UserId,
    exchange_id: Uuid,
    rated_id: UserId,
    score: i16,
) -> RateExchangeRequest {
    RateExchangeRequest {
        caller,
        exchange_id,
        rated_id,
        score,
        comment: None,
    }
}

#[tokio::test]
async fn rating_the_counterparty_succeeds() {
    let rater = UserId::random();
    let rated = UserId::random();
    let exchange = exchange_between(rater, rated, ExchangeStatus::Completed);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut ratings = MockRatingRepository::new();
    ratings.expect_insert().times(1).return_once(|_| Ok(()));

    let payload = RatingService::new(Arc::new(exchanges), Arc::new(ratings))
        .rate(rate_request(rater, exchange_id, rated, 5))
        .await
        .expect("rate succeeds");

    assert_eq!(payload.score, 5);
    assert_eq!(payload.rater_id, rater);
    assert_eq!(payload.rated_id, rated);
}

#[tokio::test]
async fn out_of_range_score_fails_before_any_lookup() {
    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_find_by_id().times(0);
    let mut ratings = MockRatingRepository::new();
    ratings.expect_insert().times(0);

    let error = RatingService::new(Arc::new(exchanges), Arc::new(ratings))
        .rate(rate_request(
            UserId::random(),
            Uuid::new_v4(),
            UserId::random(),
            6,
        ))
        .await
        .expect_err("score out of range");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn rating_someone_other_than_the_counterparty_is_rejected() {
    let rater = UserId::random();
    let exchange = exchange_between(rater, UserId::random(), ExchangeStatus::Completed);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let error = RatingService::new(Arc::new(exchanges), Arc::new(MockRatingRepository::new()))
        .rate(rate_request(rater, exchange_id, UserId::random(), 4))
        .await
        .expect_err("not the counterparty");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn stranger_rating_is_forbidden() {
    let exchange =
        exchange_between(UserId::random(), UserId::random(), ExchangeStatus::Completed);
    let exchange_id = exchange.id();
    let rated = *exchange.receiver_id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let error = RatingService::new(Arc::new(exchanges), Arc::new(MockRatingRepository::new()))
        .rate(rate_request(UserId::random(), exchange_id, rated, 4))
        .await
        .expect_err("stranger cannot rate");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn rating_before_the_validation_phase_is_invalid_state() {
    let rater = UserId::random();
    let rated = UserId::random();
    let exchange = exchange_between(rater, rated, ExchangeStatus::InProgress);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let error = RatingService::new(Arc::new(exchanges), Arc::new(MockRatingRepository::new()))
        .rate(rate_request(rater, exchange_id, rated, 4))
        .await
        .expect_err("too early to rate");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn duplicate_rating_maps_to_invalid_request() {
    let rater = UserId::random();
    let rated = UserId::random();
    let exchange = exchange_between(rater, rated, ExchangeStatus::Failed);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let mut ratings = MockRatingRepository::new();
    ratings
        .expect_insert()
        .times(1)
        .return_once(|_| Err(RatingRepositoryError::Duplicate));

    let error = RatingService::new(Arc::new(exchanges), Arc::new(ratings))
        .rate(rate_request(rater, exchange_id, rated, 2))
        .await
        .expect_err("second rating");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
