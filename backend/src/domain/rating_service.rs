//! Rating domain service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    ExchangeRepository, ExchangeRepositoryError, ListRatingsForUserRequest, RateExchangeRequest,
    RatingCommand, RatingPayload, RatingQuery, RatingRepository, RatingRepositoryError,
};
use crate::domain::{Error, Exchange, ExchangeStatus, Rating, RatingDraft, Score};

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

fn map_rating_repository_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        RatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
        RatingRepositoryError::Duplicate => {
            Error::invalid_request("participant already rated this exchange")
                .with_details(json!({ "code": "duplicate_rating" }))
        }
    }
}

/// Statuses from which participants may rate each other: the validation
/// phase and both terminal verdict outcomes.
fn accepts_rating(status: ExchangeStatus) -> bool {
    matches!(
        status,
        ExchangeStatus::PendingValidation | ExchangeStatus::Completed | ExchangeStatus::Failed
    )
}

/// Rating service implementing the rating driving ports.
#[derive(Clone)]
pub struct RatingService<E, R> {
    exchanges: Arc<E>,
    ratings: Arc<R>,
}

impl<E, R> RatingService<E, R> {
    /// Create a new service with its repositories.
    pub fn new(exchanges: Arc<E>, ratings: Arc<R>) -> Self {
        Self { exchanges, ratings }
    }
}

impl<E, R> RatingService<E, R>
where
    E: ExchangeRepository,
    R: RatingRepository,
{
    async fn load_exchange(&self, exchange_id: &Uuid) -> Result<Exchange, Error> {
        self.exchanges
            .find_by_id(exchange_id)
            .await
            .map_err(map_exchange_repository_error)?
            .ok_or_else(|| Error::not_found(format!("exchange {exchange_id} not found")))
    }
}

#[async_trait]
impl<E, R> RatingCommand for RatingService<E, R>
where
    E: ExchangeRepository,
    R: RatingRepository,
{
    async fn rate(&self, request: RateExchangeRequest) -> Result<RatingPayload, Error> {
        // Score range is checked before any persistence call.
        let score = Score::try_new(request.score).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "puntuacion",
                "code": "out_of_range",
            }))
        })?;

        let exchange = self.load_exchange(&request.exchange_id).await?;
        if !exchange.is_participant(&request.caller) {
            return Err(Error::forbidden("only participants may rate an exchange"));
        }
        if exchange.counterparty(&request.caller) != Some(&request.rated_id) {
            return Err(Error::invalid_request(
                "calificado_id must be the exchange counterparty",
            ));
        }
        if !accepts_rating(exchange.status()) {
            return Err(Error::invalid_state(format!(
                "exchange in status {} cannot be rated yet",
                exchange.status()
            )));
        }

        let rating = Rating::new(RatingDraft {
            id: Uuid::new_v4(),
            exchange_id: exchange.id(),
            rater_id: request.caller,
            rated_id: request.rated_id,
            score,
            comment: request.comment,
            created_at: Utc::now(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.ratings
            .insert(&rating)
            .await
            .map_err(map_rating_repository_error)?;

        Ok(RatingPayload::from(rating))
    }
}

#[async_trait]
impl<E, R> RatingQuery for RatingService<E, R>
where
    E: ExchangeRepository,
    R: RatingRepository,
{
    async fn list_for_user(
        &self,
        request: ListRatingsForUserRequest,
    ) -> Result<Vec<RatingPayload>, Error> {
        let ratings = self
            .ratings
            .list_for_rated(&request.rated_id)
            .await
            .map_err(map_rating_repository_error)?;
        Ok(ratings.into_iter().map(RatingPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
